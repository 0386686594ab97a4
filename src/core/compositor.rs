/// The story compositor: request → title + multi-paragraph story.
///
/// Picks a name and title, draws every story detail once, then resolves
/// and joins the beginning, transitions, middle, passages, and ending.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::content::{ContentError, ContentPack, Severity, VocabCategory};
use crate::core::dice::{choose, Picker, RandomPicker};
use crate::core::naming::{pick_character_name, pick_title, StoryTerms};
use crate::core::template::{Bindings, Placeholder, Template};
use crate::schema::story::{StoryDraft, StoryRequest};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("content directory not found: {0}")]
    MissingContentDir(String),
}

/// The role a section plays in the finished story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Beginning,
    Transition,
    Middle,
    Passage,
    Ending,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub text: String,
}

/// A composed story before it becomes a [`StoryDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub title: String,
    pub sections: Vec<Section>,
    /// The values every section was resolved against.
    pub bindings: Bindings,
}

impl Composition {
    /// Sections joined with blank lines.
    pub fn content(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = &str> + '_ {
        self.sections
            .iter()
            .filter(move |s| s.kind == kind)
            .map(|s| s.text.as_str())
    }
}

/// The top-level story engine. Built via `StoryEngine::builder()`.
///
/// Holds one immutable content pack; `generate` takes `&self`, so a single
/// engine can serve many threads at once.
#[derive(Debug, Clone)]
pub struct StoryEngine {
    content: ContentPack,
}

/// Builder for constructing a `StoryEngine`.
pub struct StoryEngineBuilder {
    data_root: String,
    content_packs: Vec<String>,
    content_dir: Option<String>,
    /// Directly provided content (for testing without files).
    content: Option<ContentPack>,
}

impl StoryEngine {
    pub fn builder() -> StoryEngineBuilder {
        StoryEngineBuilder {
            data_root: "story_data".to_string(),
            content_packs: Vec::new(),
            content_dir: None,
            content: None,
        }
    }

    /// An engine over exactly `content`, without the built-in pack.
    pub fn new(content: ContentPack) -> Result<StoryEngine, EngineError> {
        Self::builder().with_content(content).build()
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    /// Write a story using a fresh thread-local random source.
    pub fn generate(&self, request: &StoryRequest) -> StoryDraft {
        self.generate_with(request, &mut RandomPicker::new(rand::thread_rng()))
    }

    /// Write a story, taking every random choice from `picker`.
    pub fn generate_with<P: Picker + ?Sized>(
        &self,
        request: &StoryRequest,
        picker: &mut P,
    ) -> StoryDraft {
        let composition = self.compose_with(request, picker);
        StoryDraft {
            content: composition.content(),
            title: composition.title,
            child_name: request.child_name.clone(),
            animal: request.animal.clone(),
            theme: request.theme.clone(),
            custom_message: request.custom_message.clone(),
            language: request.language_or_default().to_string(),
            image_url: None,
        }
    }

    /// Compose a story and keep its sections and bindings.
    ///
    /// Never fails: unknown animals and themes read the default tables, and
    /// the child name is used as given, even when empty.
    #[instrument(skip(self, picker), fields(animal = %request.animal, theme = %request.theme))]
    pub fn compose_with<P: Picker + ?Sized>(
        &self,
        request: &StoryRequest,
        picker: &mut P,
    ) -> Composition {
        let frags = &self.content.fragments;
        let vocabulary = &self.content.vocabulary;
        let terms = StoryTerms::new(&request.animal, &request.theme);
        if terms.animal.is_none() {
            debug!(animal = %request.animal, "unknown animal, using default animal content");
        }
        if terms.theme.is_none() {
            debug!(theme = %request.theme, "unknown theme, using default theme content");
        }

        let character_name = pick_character_name(vocabulary, terms.animal, picker);
        let title = pick_title(
            frags,
            vocabulary,
            &terms,
            &request.child_name,
            &character_name,
            picker,
        );
        let bindings = self.bind_details(&terms, &request.child_name, &character_name, picker);

        let mut sections = Vec::new();
        let mut push = |kind: SectionKind, template: Option<&Template>| {
            if let Some(template) = template {
                sections.push(Section {
                    kind,
                    text: bindings.render(template),
                });
            }
        };

        push(SectionKind::Beginning, choose(picker, frags.beginnings_for(terms.animal)));
        push(SectionKind::Transition, choose(picker, &frags.transitions));
        push(SectionKind::Middle, choose(picker, frags.middles_for(terms.theme)));
        push(SectionKind::Transition, choose(picker, &frags.transitions));
        for passage in &frags.passages {
            push(SectionKind::Passage, Some(passage));
        }
        push(SectionKind::Ending, choose(picker, frags.endings_for(terms.theme)));

        if !request.custom_message.is_empty() {
            sections.push(Section {
                kind: SectionKind::Message,
                text: format!(
                    "Special message for {}: {}",
                    request.child_name, request.custom_message
                ),
            });
        }

        debug!(
            title = %title,
            character = %character_name,
            sections = sections.len(),
            "composed story"
        );

        Composition {
            title,
            sections,
            bindings,
        }
    }

    /// Draw every story detail once. The same values fill every section.
    fn bind_details<P: Picker + ?Sized>(
        &self,
        terms: &StoryTerms,
        child_name: &str,
        character_name: &str,
        picker: &mut P,
    ) -> Bindings {
        let vocabulary = &self.content.vocabulary;
        let mut bindings = Bindings::new()
            .with(Placeholder::ChildName, child_name)
            .with(Placeholder::AnimalName, character_name)
            .with(Placeholder::Animal, terms.animal_title())
            .with(Placeholder::AnimalType, terms.animal_word.as_str())
            .with(Placeholder::Theme, terms.theme_word.as_str());

        for category in VocabCategory::DETAILS {
            let value = vocabulary.draw(category, terms.animal, terms.theme, picker);
            if category == VocabCategory::TreasureItem {
                bindings.insert(Placeholder::TreasureItems, pluralize(&value));
            }
            bindings.insert(category.placeholder(), value);
        }
        bindings
    }
}

/// English plural for the short noun phrases in vocabulary tables.
fn pluralize(phrase: &str) -> String {
    let ends_with_consonant_y = phrase.ends_with('y')
        && !phrase
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c));
    if phrase.ends_with('s') {
        phrase.to_string()
    } else if ends_with_consonant_y {
        format!("{}ies", &phrase[..phrase.len() - 1])
    } else if phrase.ends_with("ch") || phrase.ends_with("sh") || phrase.ends_with('x') {
        format!("{phrase}es")
    } else {
        format!("{phrase}s")
    }
}

impl StoryEngineBuilder {
    /// Directory that named content packs live under. Defaults to
    /// `story_data`.
    pub fn data_root(mut self, path: &str) -> Self {
        self.data_root = path.to_string();
        self
    }

    /// Named packs under the data root, merged in order over the base pack.
    pub fn content_packs(mut self, packs: &[&str]) -> Self {
        self.content_packs = packs.iter().map(|s| s.to_string()).collect();
        self
    }

    /// A project-specific pack merged last. Must exist.
    pub fn content_dir(mut self, path: &str) -> Self {
        self.content_dir = Some(path.to_string());
        self
    }

    /// Provide the base content directly instead of the built-in pack.
    pub fn with_content(mut self, content: ContentPack) -> Self {
        self.content = Some(content);
        self
    }

    pub fn build(self) -> Result<StoryEngine, EngineError> {
        let mut content = match self.content {
            Some(content) => content,
            None => ContentPack::builtin()?,
        };

        for name in &self.content_packs {
            let dir = Path::new(&self.data_root).join(name);
            if dir.exists() {
                content.merge(ContentPack::load_from_dir(&dir)?);
            } else {
                warn!(pack = %name, dir = %dir.display(), "content pack not found, skipping");
            }
        }

        if let Some(ref dir) = self.content_dir {
            let dir = Path::new(dir);
            if !dir.exists() {
                return Err(EngineError::MissingContentDir(dir.display().to_string()));
            }
            content.merge(ContentPack::load_from_dir(dir)?);
        }

        for issue in content.lint().iter().filter(|i| i.severity == Severity::Warning) {
            warn!(%issue, "content warning");
        }
        content.validate()?;

        Ok(StoryEngine { content })
    }
}
