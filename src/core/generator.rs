/// Story generator seam — anything that can turn a request into a titled story.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::compositor::StoryEngine;
use crate::schema::story::StoryRequest;

/// Title and body of a freshly written story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("story generator unavailable: {0}")]
    Unavailable(String),
}

/// Writes a story for a request. The service layer depends on this trait,
/// not on a concrete engine.
pub trait StoryGenerator: Send + Sync {
    fn write_story(&self, request: &StoryRequest) -> Result<GeneratedStory, GenerateError>;
}

impl StoryGenerator for StoryEngine {
    fn write_story(&self, request: &StoryRequest) -> Result<GeneratedStory, GenerateError> {
        let draft = self.generate(request);
        Ok(GeneratedStory {
            title: draft.title,
            content: draft.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_writes_through_trait() {
        let engine = StoryEngine::builder().build().unwrap();
        let generator: &dyn StoryGenerator = &engine;
        let story = generator
            .write_story(&StoryRequest::new("Mia", "owl", "dreams"))
            .unwrap();
        assert!(!story.title.is_empty());
        assert!(story.content.contains("Mia"));
    }
}
