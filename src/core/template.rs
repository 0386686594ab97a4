/// Story templates — placeholder vocabulary, parsing, and resolution.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unclosed brace at byte {0}")]
    UnclosedBrace(usize),
    #[error("nested braces are not allowed (byte {0})")]
    NestedBrace(usize),
    #[error("empty braces at byte {0}")]
    EmptyBraces(usize),
    #[error("unmatched closing brace at byte {0}")]
    UnmatchedClose(usize),
}

/// The closed set of names a template may reference as `{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Placeholder {
    ChildName,
    AnimalName,
    /// The caller's animal word with its first letter capitalised.
    Animal,
    /// The caller's animal word as written, lower-cased.
    AnimalType,
    Theme,
    Setting,
    Obstacle,
    Treasure,
    TreasureItem,
    TreasureItems,
    ItemDescription,
    LandscapeFeature,
    CreatureInNeed,
    Food,
    DreamDescription,
    ImpossibleDream,
    WonderDescription,
    Souvenir,
    ChildWish,
    Boundary,
    MysteriousPlace,
    OtherCreatures,
}

impl Placeholder {
    pub const ALL: [Placeholder; 22] = [
        Placeholder::ChildName,
        Placeholder::AnimalName,
        Placeholder::Animal,
        Placeholder::AnimalType,
        Placeholder::Theme,
        Placeholder::Setting,
        Placeholder::Obstacle,
        Placeholder::Treasure,
        Placeholder::TreasureItem,
        Placeholder::TreasureItems,
        Placeholder::ItemDescription,
        Placeholder::LandscapeFeature,
        Placeholder::CreatureInNeed,
        Placeholder::Food,
        Placeholder::DreamDescription,
        Placeholder::ImpossibleDream,
        Placeholder::WonderDescription,
        Placeholder::Souvenir,
        Placeholder::ChildWish,
        Placeholder::Boundary,
        Placeholder::MysteriousPlace,
        Placeholder::OtherCreatures,
    ];

    /// The name as written between braces in template text.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChildName => "childName",
            Self::AnimalName => "animalName",
            Self::Animal => "animal",
            Self::AnimalType => "animalType",
            Self::Theme => "theme",
            Self::Setting => "setting",
            Self::Obstacle => "obstacle",
            Self::Treasure => "treasure",
            Self::TreasureItem => "treasureItem",
            Self::TreasureItems => "treasureItems",
            Self::ItemDescription => "itemDescription",
            Self::LandscapeFeature => "landscapeFeature",
            Self::CreatureInNeed => "creatureInNeed",
            Self::Food => "food",
            Self::DreamDescription => "dreamDescription",
            Self::ImpossibleDream => "impossibleDream",
            Self::WonderDescription => "wonderDescription",
            Self::Souvenir => "souvenir",
            Self::ChildWish => "childWish",
            Self::Boundary => "boundary",
            Self::MysteriousPlace => "mysteriousPlace",
            Self::OtherCreatures => "otherCreatures",
        }
    }

    pub fn from_name(name: &str) -> Option<Placeholder> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// A segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, emitted as-is.
    Literal(String),
    /// A placeholder from the known vocabulary.
    Slot(Placeholder),
    /// A `{name}` outside the vocabulary. Emitted back verbatim and
    /// reported by content linting.
    Unknown(String),
}

/// A parsed template — a sequence of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse template text into segments.
    ///
    /// `{name}` becomes a `Slot` when `name` is in the placeholder
    /// vocabulary and `Unknown` otherwise. There is no escape syntax:
    /// a stray `}`, an unclosed `{`, nested or empty braces are errors.
    pub fn parse(input: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut chars = input.char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '{' => {
                    if literal_start < i {
                        segments.push(TemplateSegment::Literal(
                            input[literal_start..i].to_string(),
                        ));
                    }
                    let start = i + 1;
                    let end = loop {
                        match chars.next() {
                            Some((j, '}')) => break j,
                            Some((j, '{')) => return Err(TemplateError::NestedBrace(j)),
                            Some(_) => {}
                            None => return Err(TemplateError::UnclosedBrace(i)),
                        }
                    };
                    let name = &input[start..end];
                    if name.is_empty() {
                        return Err(TemplateError::EmptyBraces(i));
                    }
                    segments.push(match Placeholder::from_name(name) {
                        Some(p) => TemplateSegment::Slot(p),
                        None => TemplateSegment::Unknown(name.to_string()),
                    });
                    literal_start = end + 1;
                }
                '}' => return Err(TemplateError::UnmatchedClose(i)),
                _ => {}
            }
        }

        if literal_start < input.len() {
            segments.push(TemplateSegment::Literal(input[literal_start..].to_string()));
        }

        Ok(Template { segments })
    }

    /// Placeholders this template references, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Slot(p) => Some(*p),
            _ => None,
        })
    }

    /// Names between braces that are not in the placeholder vocabulary.
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(|s| match s {
            TemplateSegment::Unknown(name) => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.placeholders().any(|p| p == placeholder)
    }
}

/// Placeholder values for one story. Built once, then shared by every
/// section of that story.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: FxHashMap<Placeholder, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.insert(placeholder, value);
        self
    }

    pub fn insert(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Substitute every bound slot in a single pass.
    ///
    /// Unbound slots and unknown names are written back as `{name}`.
    /// Substituted values are never scanned again.
    pub fn render(&self, template: &Template) -> String {
        let mut out = String::new();
        for segment in &template.segments {
            match segment {
                TemplateSegment::Literal(text) => out.push_str(text),
                TemplateSegment::Slot(p) => match self.get(*p) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(p.name());
                        out.push('}');
                    }
                },
                TemplateSegment::Unknown(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }
}

/// Parse `template` and resolve it against `bindings`.
pub fn resolve(template: &str, bindings: &Bindings) -> Result<String, TemplateError> {
    Ok(bindings.render(&Template::parse(template)?))
}
