/// Story service — validates requests, writes stories, and keeps them.

use thiserror::Error;
use tracing::{info, instrument};

use crate::core::generator::{GenerateError, StoryGenerator};
use crate::schema::story::{RequestError, Story, StoryDraft, StoryFilter, StoryId, StoryRequest};
use crate::store::{StoreError, StoryStore};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid story request: {0}")]
    InvalidRequest(#[from] RequestError),
    #[error("story generation failed: {0}")]
    Generation(#[from] GenerateError),
    #[error("story storage failed: {0}")]
    Store(#[from] StoreError),
}

/// Front door for creating and browsing stories.
pub struct StoryService<G, S> {
    generator: G,
    store: S,
}

impl<G: StoryGenerator, S: StoryStore> StoryService<G, S> {
    pub fn new(generator: G, store: S) -> Self {
        Self { generator, store }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `request`, write its story, and store it.
    ///
    /// Nothing is stored when validation or generation fails.
    #[instrument(skip(self, request), fields(animal = %request.animal, theme = %request.theme))]
    pub fn create_story(&self, request: &StoryRequest) -> Result<Story, ServiceError> {
        request.validate()?;
        let written = self.generator.write_story(request)?;
        let draft = StoryDraft {
            title: written.title,
            content: written.content,
            child_name: request.child_name.clone(),
            animal: request.animal.clone(),
            theme: request.theme.clone(),
            custom_message: request.custom_message.clone(),
            language: request.language_or_default().to_string(),
            image_url: None,
        };
        let story = self.store.create(draft)?;
        info!(id = story.id.0, title = %story.title, "created story");
        Ok(story)
    }

    pub fn get_story(&self, id: StoryId) -> Result<Option<Story>, ServiceError> {
        Ok(self.store.get(id)?)
    }

    pub fn list_stories(&self) -> Result<Vec<Story>, ServiceError> {
        Ok(self.store.list(&StoryFilter::default())?)
    }

    pub fn list_by_animal(&self, animal: &str) -> Result<Vec<Story>, ServiceError> {
        Ok(self.store.list(&StoryFilter::animal(animal))?)
    }

    pub fn list_by_theme(&self, theme: &str) -> Result<Vec<Story>, ServiceError> {
        Ok(self.store.list(&StoryFilter::theme(theme))?)
    }
}
