/// Story persistence — the storage seam and an in-memory implementation.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::schema::story::{Story, StoryDraft, StoryFilter, StoryId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("story store lock poisoned")]
    Poisoned,
    #[error("story not found: {0:?}")]
    NotFound(StoryId),
}

/// Where finished stories live.
///
/// `list` returns newest first; stories created in the same instant are
/// ordered by descending id.
pub trait StoryStore: Send + Sync {
    fn create(&self, draft: StoryDraft) -> Result<Story, StoreError>;
    fn get(&self, id: StoryId) -> Result<Option<Story>, StoreError>;
    fn list(&self, filter: &StoryFilter) -> Result<Vec<Story>, StoreError>;
    /// Overwrite a stored story's draft fields, keeping its id and
    /// creation time.
    fn replace(&self, id: StoryId, draft: StoryDraft) -> Result<Story, StoreError>;
}

/// Process-local store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryStore {
    stories: RwLock<BTreeMap<StoryId, Story>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            stories: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.stories.read().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StoryStore for MemoryStore {
    fn create(&self, draft: StoryDraft) -> Result<Story, StoreError> {
        let id = StoryId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let story = Story::from_draft(draft, id, Utc::now());
        let mut stories = self.stories.write().map_err(|_| StoreError::Poisoned)?;
        stories.insert(id, story.clone());
        debug!(id = id.0, title = %story.title, "stored story");
        Ok(story)
    }

    fn get(&self, id: StoryId) -> Result<Option<Story>, StoreError> {
        let stories = self.stories.read().map_err(|_| StoreError::Poisoned)?;
        Ok(stories.get(&id).cloned())
    }

    fn list(&self, filter: &StoryFilter) -> Result<Vec<Story>, StoreError> {
        let stories = self.stories.read().map_err(|_| StoreError::Poisoned)?;
        let mut found: Vec<Story> = stories
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    fn replace(&self, id: StoryId, draft: StoryDraft) -> Result<Story, StoreError> {
        let mut stories = self.stories.write().map_err(|_| StoreError::Poisoned)?;
        let existing = stories.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *existing = Story::from_draft(draft, id, existing.created_at);
        Ok(existing.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, animal: &str, theme: &str) -> StoryDraft {
        StoryDraft {
            title: title.to_string(),
            content: "Once upon a time.".to_string(),
            child_name: "Mia".to_string(),
            animal: animal.to_string(),
            theme: theme.to_string(),
            custom_message: String::new(),
            language: "en".to_string(),
            image_url: None,
        }
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = MemoryStore::new();
        let a = store.create(draft("A", "fox", "courage")).unwrap();
        let b = store.create(draft("B", "owl", "dreams")).unwrap();
        assert_eq!(a.id, StoryId(1));
        assert_eq!(b.id, StoryId(2));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get(StoryId(9)).unwrap(), None);
    }

    #[test]
    fn list_is_newest_first_and_filtered() {
        let store = MemoryStore::new();
        store.create(draft("A", "fox", "courage")).unwrap();
        store.create(draft("B", "owl", "courage")).unwrap();
        store.create(draft("C", "fox", "dreams")).unwrap();

        let all: Vec<String> = store
            .list(&StoryFilter::default())
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(all, vec!["C", "B", "A"]);

        let foxes: Vec<String> = store
            .list(&StoryFilter::animal("fox"))
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(foxes, vec!["C", "A"]);

        let courage = store.list(&StoryFilter::theme("courage")).unwrap();
        assert_eq!(courage.len(), 2);
    }

    #[test]
    fn replace_keeps_id_and_timestamp() {
        let store = MemoryStore::new();
        let original = store.create(draft("A", "fox", "courage")).unwrap();
        let mut updated = draft("A", "fox", "courage");
        updated.image_url = Some("https://example.org/a.png".to_string());
        let replaced = store.replace(original.id, updated).unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.created_at, original.created_at);
        assert_eq!(
            store.get(original.id).unwrap().and_then(|s| s.image_url),
            Some("https://example.org/a.png".to_string())
        );
    }

    #[test]
    fn replace_missing_fails() {
        let store = MemoryStore::new();
        let result = store.replace(StoryId(3), draft("A", "fox", "courage"));
        assert!(matches!(result, Err(StoreError::NotFound(StoryId(3)))));
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.create(draft(&format!("S{i}"), "fox", "courage")).unwrap().id)
            })
            .collect();
        let mut ids: Vec<StoryId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }
}
