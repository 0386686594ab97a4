use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Language recorded on stories when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Newtype wrapper for persisted story IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoryId(pub u64);

/// The parameters a reader picks before a story is written.
///
/// `animal` and `theme` are kept as the caller typed them; the engine maps
/// them onto its content keys and falls back when they are unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub child_name: String,
    pub animal: String,
    pub theme: String,
    #[serde(default)]
    pub custom_message: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl StoryRequest {
    pub fn new(
        child_name: impl Into<String>,
        animal: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            child_name: child_name.into(),
            animal: animal.into(),
            theme: theme.into(),
            custom_message: String::new(),
            language: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = message.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Reject requests with an empty child name, animal, or theme.
    ///
    /// The story engine does not call this; it writes a story for whatever
    /// it is given. Front ends run it before asking for a story.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.child_name.trim().is_empty() {
            return Err(RequestError::MissingField("childName"));
        }
        if self.animal.trim().is_empty() {
            return Err(RequestError::MissingField("animal"));
        }
        if self.theme.trim().is_empty() {
            return Err(RequestError::MissingField("theme"));
        }
        Ok(())
    }

    pub fn language_or_default(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// A finished story that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDraft {
    pub title: String,
    /// Paragraphs separated by a blank line.
    pub content: String,
    pub child_name: String,
    pub animal: String,
    pub theme: String,
    pub custom_message: String,
    pub language: String,
    pub image_url: Option<String>,
}

impl StoryDraft {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split("\n\n")
    }
}

/// A stored story, as returned by a [`crate::store::StoryStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    pub content: String,
    pub child_name: String,
    pub animal: String,
    pub theme: String,
    pub custom_message: String,
    pub language: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Story {
    pub fn from_draft(draft: StoryDraft, id: StoryId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            child_name: draft.child_name,
            animal: draft.animal,
            theme: draft.theme,
            custom_message: draft.custom_message,
            language: draft.language,
            image_url: draft.image_url,
            created_at,
        }
    }
}

/// Narrowing criteria for listing stories. Empty filter matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryFilter {
    pub animal: Option<String>,
    pub theme: Option<String>,
    pub language: Option<String>,
}

impl StoryFilter {
    pub fn animal(animal: impl Into<String>) -> Self {
        Self {
            animal: Some(animal.into()),
            ..Self::default()
        }
    }

    pub fn theme(theme: impl Into<String>) -> Self {
        Self {
            theme: Some(theme.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, story: &Story) -> bool {
        let field_ok = |want: &Option<String>, have: &str| want.as_deref().map_or(true, |w| w == have);
        field_ok(&self.animal, &story.animal)
            && field_ok(&self.theme, &story.theme)
            && field_ok(&self.language, &story.language)
    }
}
