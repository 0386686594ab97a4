/// Content packs — narrative fragments and vocabulary tables, loaded from RON.
///
/// A pack is read-only once built. The engine holds exactly one merged
/// pack and shares it across every story it writes.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::dice::{choose, Picker};
use crate::core::template::{Placeholder, Template, TemplateError};
use crate::schema::keys::{AnimalKey, ThemeKey};

const BUILTIN_FRAGMENTS: &str = include_str!("../../story_data/default/fragments.ron");
const BUILTIN_VOCABULARY: &str = include_str!("../../story_data/default/vocabulary.ron");

/// The only slots bound when a title is filled.
pub const TITLE_SLOTS: [Placeholder; 5] = [
    Placeholder::AnimalName,
    Placeholder::ChildName,
    Placeholder::Theme,
    Placeholder::Animal,
    Placeholder::Setting,
];

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("template parse error in {location}: {source}")]
    Template {
        location: String,
        #[source]
        source: TemplateError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("no content files found in {0}")]
    NoContentFiles(String),
    #[error("invalid content pack: {0}")]
    Invalid(String),
}

/// Look up `key` in a keyed table, falling back to `default` when the key
/// is absent or its list is empty. Each table falls back on its own.
pub fn keyed_lookup<'a, K, V>(map: &'a FxHashMap<K, Vec<V>>, key: Option<K>, default: K) -> &'a [V]
where
    K: Eq + Hash,
{
    key.and_then(|k| map.get(&k))
        .filter(|list| !list.is_empty())
        .or_else(|| map.get(&default))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// The word lists a story draws its details from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VocabCategory {
    CharacterName,
    Setting,
    Obstacle,
    Treasure,
    TreasureItem,
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
    OtherCreature,
}

impl VocabCategory {
    /// Story details, in the order the compositor draws them.
    pub const DETAILS: [VocabCategory; 16] = [
        VocabCategory::Setting,
        VocabCategory::Obstacle,
        VocabCategory::Treasure,
        VocabCategory::TreasureItem,
        VocabCategory::ItemDescription,
        VocabCategory::LandscapeFeature,
        VocabCategory::CreatureInNeed,
        VocabCategory::Food,
        VocabCategory::DreamDescription,
        VocabCategory::ImpossibleDream,
        VocabCategory::WonderDescription,
        VocabCategory::Souvenir,
        VocabCategory::ChildWish,
        VocabCategory::Boundary,
        VocabCategory::MysteriousPlace,
        VocabCategory::OtherCreature,
    ];

    /// The slot a drawn value fills.
    pub fn placeholder(&self) -> Placeholder {
        match self {
            Self::CharacterName => Placeholder::AnimalName,
            Self::Setting => Placeholder::Setting,
            Self::Obstacle => Placeholder::Obstacle,
            Self::Treasure => Placeholder::Treasure,
            Self::TreasureItem => Placeholder::TreasureItem,
            Self::ItemDescription => Placeholder::ItemDescription,
            Self::LandscapeFeature => Placeholder::LandscapeFeature,
            Self::CreatureInNeed => Placeholder::CreatureInNeed,
            Self::Food => Placeholder::Food,
            Self::DreamDescription => Placeholder::DreamDescription,
            Self::ImpossibleDream => Placeholder::ImpossibleDream,
            Self::WonderDescription => Placeholder::WonderDescription,
            Self::Souvenir => Placeholder::Souvenir,
            Self::ChildWish => Placeholder::ChildWish,
            Self::Boundary => Placeholder::Boundary,
            Self::MysteriousPlace => Placeholder::MysteriousPlace,
            Self::OtherCreature => Placeholder::OtherCreatures,
        }
    }

    /// Literal used when the pack has no candidates at all.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::CharacterName => "Pip",
            Self::Setting => "magical place",
            Self::Obstacle => "challenge",
            Self::Treasure => "treasure",
            Self::TreasureItem => "special item",
            Self::ItemDescription => "little treasures that shimmered in the light",
            Self::LandscapeFeature => "special place",
            Self::CreatureInNeed => "little creature",
            Self::Food => "food",
            Self::DreamDescription => "something magical",
            Self::ImpossibleDream => "do the impossible",
            Self::WonderDescription => "sights too lovely for words",
            Self::Souvenir => "keepsake",
            Self::ChildWish => "something wonderful",
            Self::Boundary => "horizon",
            Self::MysteriousPlace => "Magic Place",
            Self::OtherCreature => "other animals",
        }
    }
}

/// One vocabulary list, keyed by animal, by theme, or shared by all stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VocabularyTable {
    ByAnimal(FxHashMap<AnimalKey, Vec<String>>),
    ByTheme(FxHashMap<ThemeKey, Vec<String>>),
    Shared(Vec<String>),
}

impl VocabularyTable {
    pub fn candidates(&self, animal: Option<AnimalKey>, theme: Option<ThemeKey>) -> &[String] {
        match self {
            Self::ByAnimal(map) => keyed_lookup(map, animal, AnimalKey::DEFAULT),
            Self::ByTheme(map) => keyed_lookup(map, theme, ThemeKey::DEFAULT),
            Self::Shared(list) => list,
        }
    }

    /// Entries from `other` replace entries here key by key. A table whose
    /// keying changes is replaced outright.
    fn merge(&mut self, other: VocabularyTable) {
        match (self, other) {
            (Self::ByAnimal(mine), Self::ByAnimal(theirs)) => mine.extend(theirs),
            (Self::ByTheme(mine), Self::ByTheme(theirs)) => mine.extend(theirs),
            (slot, other) => *slot = other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    pub tables: FxHashMap<VocabCategory, VocabularyTable>,
}

impl Vocabulary {
    pub fn parse_ron(input: &str) -> Result<Vocabulary, ContentError> {
        Ok(ron::from_str(input)?)
    }

    pub fn candidates(
        &self,
        category: VocabCategory,
        animal: Option<AnimalKey>,
        theme: Option<ThemeKey>,
    ) -> &[String] {
        match self.tables.get(&category) {
            Some(table) => table.candidates(animal, theme),
            None => &[],
        }
    }

    /// Draw one entry uniformly, or the category's literal fallback.
    pub fn draw<P: Picker + ?Sized>(
        &self,
        category: VocabCategory,
        animal: Option<AnimalKey>,
        theme: Option<ThemeKey>,
        picker: &mut P,
    ) -> String {
        choose(picker, self.candidates(category, animal, theme))
            .cloned()
            .unwrap_or_else(|| category.fallback().to_string())
    }

    /// The first entry, without consuming a roll.
    pub fn first(
        &self,
        category: VocabCategory,
        animal: Option<AnimalKey>,
        theme: Option<ThemeKey>,
    ) -> String {
        self.candidates(category, animal, theme)
            .first()
            .cloned()
            .unwrap_or_else(|| category.fallback().to_string())
    }

    pub fn merge(&mut self, other: Vocabulary) {
        for (category, table) in other.tables {
            match self.tables.get_mut(&category) {
                Some(existing) => existing.merge(table),
                None => {
                    self.tables.insert(category, table);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// Narrative fragments by role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentLibrary {
    pub beginnings: FxHashMap<AnimalKey, Vec<Template>>,
    pub middles: FxHashMap<ThemeKey, Vec<Template>>,
    pub endings: FxHashMap<ThemeKey, Vec<Template>>,
    /// Connective paragraphs placed around the middle section.
    pub transitions: Vec<Template>,
    /// Scene-setting paragraphs, all used, in order.
    pub passages: Vec<Template>,
    pub titles: Vec<Template>,
}

// The RON files hold plain strings; templates are parsed while loading.
#[derive(Debug, Deserialize)]
#[serde(rename = "Fragments")]
struct RonFragments {
    #[serde(default)]
    beginnings: FxHashMap<AnimalKey, Vec<String>>,
    #[serde(default)]
    middles: FxHashMap<ThemeKey, Vec<String>>,
    #[serde(default)]
    endings: FxHashMap<ThemeKey, Vec<String>>,
    #[serde(default)]
    transitions: Vec<String>,
    #[serde(default)]
    passages: Vec<String>,
    #[serde(default)]
    titles: Vec<String>,
}

fn parse_list(location: &str, texts: &[String]) -> Result<Vec<Template>, ContentError> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            Template::parse(text).map_err(|source| ContentError::Template {
                location: format!("{location}[{i}]"),
                source,
            })
        })
        .collect()
}

fn parse_keyed<K>(
    table: &str,
    raw: FxHashMap<K, Vec<String>>,
) -> Result<FxHashMap<K, Vec<Template>>, ContentError>
where
    K: Eq + Hash + fmt::Debug,
{
    raw.into_iter()
        .map(|(key, texts)| {
            let templates = parse_list(&format!("{table}.{key:?}"), &texts)?;
            Ok((key, templates))
        })
        .collect()
}

impl FragmentLibrary {
    pub fn parse_ron(input: &str) -> Result<FragmentLibrary, ContentError> {
        let raw: RonFragments = ron::from_str(input)?;
        Ok(FragmentLibrary {
            beginnings: parse_keyed("beginnings", raw.beginnings)?,
            middles: parse_keyed("middles", raw.middles)?,
            endings: parse_keyed("endings", raw.endings)?,
            transitions: parse_list("transitions", &raw.transitions)?,
            passages: parse_list("passages", &raw.passages)?,
            titles: parse_list("titles", &raw.titles)?,
        })
    }

    pub fn beginnings_for(&self, animal: Option<AnimalKey>) -> &[Template] {
        keyed_lookup(&self.beginnings, animal, AnimalKey::DEFAULT)
    }

    pub fn middles_for(&self, theme: Option<ThemeKey>) -> &[Template] {
        keyed_lookup(&self.middles, theme, ThemeKey::DEFAULT)
    }

    pub fn endings_for(&self, theme: Option<ThemeKey>) -> &[Template] {
        keyed_lookup(&self.endings, theme, ThemeKey::DEFAULT)
    }

    /// Keyed entries from `other` override ours; its global lists replace
    /// ours when non-empty.
    pub fn merge(&mut self, other: FragmentLibrary) {
        self.beginnings.extend(other.beginnings);
        self.middles.extend(other.middles);
        self.endings.extend(other.endings);
        if !other.transitions.is_empty() {
            self.transitions = other.transitions;
        }
        if !other.passages.is_empty() {
            self.passages = other.passages;
        }
        if !other.titles.is_empty() {
            self.titles = other.titles;
        }
    }

    /// Every template with a location label, e.g. `middles.Courage[1]`.
    pub fn templates(&self) -> Vec<(String, &Template)> {
        let mut out = Vec::new();
        push_keyed(&mut out, "beginnings", &self.beginnings);
        push_keyed(&mut out, "middles", &self.middles);
        push_keyed(&mut out, "endings", &self.endings);
        for (table, list) in [
            ("transitions", &self.transitions),
            ("passages", &self.passages),
            ("titles", &self.titles),
        ] {
            for (i, t) in list.iter().enumerate() {
                out.push((format!("{table}[{i}]"), t));
            }
        }
        out
    }
}

fn push_keyed<'a, K>(
    out: &mut Vec<(String, &'a Template)>,
    table: &str,
    map: &'a FxHashMap<K, Vec<Template>>,
) where
    K: Ord + Hash + fmt::Debug,
{
    for (key, list) in sorted_entries(map) {
        for (i, t) in list.iter().enumerate() {
            out.push((format!("{table}.{key}[{i}]"), t));
        }
    }
}

fn sorted_entries<K, V>(map: &FxHashMap<K, V>) -> Vec<(String, &V)>
where
    K: Ord + Hash + fmt::Debug,
{
    let mut keys: Vec<&K> = map.keys().collect();
    keys.sort();
    keys.into_iter()
        .filter_map(|k| map.get(k).map(|v| (format!("{k:?}"), v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Content pack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A problem found by [`ContentPack::lint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentIssue {
    pub severity: Severity,
    pub location: String,
    pub message: String,
}

impl fmt::Display for ContentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{level}: {}: {}", self.location, self.message)
    }
}

/// Fragments plus vocabulary: everything the engine needs to write a story.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPack {
    pub fragments: FragmentLibrary,
    pub vocabulary: Vocabulary,
}

impl ContentPack {
    pub const FRAGMENTS_FILE: &'static str = "fragments.ron";
    pub const VOCABULARY_FILE: &'static str = "vocabulary.ron";

    /// The pack compiled into the crate.
    pub fn builtin() -> Result<ContentPack, ContentError> {
        Self::parse_ron(BUILTIN_FRAGMENTS, BUILTIN_VOCABULARY)
    }

    pub fn parse_ron(fragments: &str, vocabulary: &str) -> Result<ContentPack, ContentError> {
        Ok(ContentPack {
            fragments: FragmentLibrary::parse_ron(fragments)?,
            vocabulary: Vocabulary::parse_ron(vocabulary)?,
        })
    }

    /// Load `fragments.ron` and `vocabulary.ron` from a directory. Either
    /// file may be missing, not both.
    pub fn load_from_dir(dir: &Path) -> Result<ContentPack, ContentError> {
        let fragments_path = dir.join(Self::FRAGMENTS_FILE);
        let vocabulary_path = dir.join(Self::VOCABULARY_FILE);
        if !fragments_path.exists() && !vocabulary_path.exists() {
            return Err(ContentError::NoContentFiles(dir.display().to_string()));
        }

        let mut pack = ContentPack::default();
        if fragments_path.exists() {
            let contents = std::fs::read_to_string(&fragments_path)?;
            pack.fragments = FragmentLibrary::parse_ron(&contents)?;
        }
        if vocabulary_path.exists() {
            let contents = std::fs::read_to_string(&vocabulary_path)?;
            pack.vocabulary = Vocabulary::parse_ron(&contents)?;
        }

        info!(
            dir = %dir.display(),
            templates = pack.fragments.templates().len(),
            vocabulary_tables = pack.vocabulary.tables.len(),
            "loaded content pack"
        );
        Ok(pack)
    }

    pub fn merge(&mut self, other: ContentPack) {
        self.fragments.merge(other.fragments);
        self.vocabulary.merge(other.vocabulary);
    }

    /// Check the pack for authoring mistakes.
    ///
    /// Errors make the pack unusable: unknown placeholders, or a missing
    /// default entry for a fragment table. Warnings flag thin or missing
    /// content that a fallback will cover.
    pub fn lint(&self) -> Vec<ContentIssue> {
        let mut issues = Vec::new();
        let mut error = |location: &str, message: String| {
            issues.push(ContentIssue {
                severity: Severity::Error,
                location: location.to_string(),
                message,
            })
        };

        for (location, template) in self.fragments.templates() {
            for name in template.unknown_names() {
                error(&location, format!("unknown placeholder '{{{name}}}'"));
            }
        }
        for (i, template) in self.fragments.titles.iter().enumerate() {
            for slot in template.placeholders().filter(|p| !TITLE_SLOTS.contains(p)) {
                error(
                    &format!("titles[{i}]"),
                    format!("'{{{}}}' is not available in titles", slot.name()),
                );
            }
        }

        let frags = &self.fragments;
        if frags.beginnings_for(None).is_empty() {
            error("beginnings", format!("no entries for the default animal {:?}", AnimalKey::DEFAULT));
        }
        if frags.middles_for(None).is_empty() {
            error("middles", format!("no entries for the default theme {:?}", ThemeKey::DEFAULT));
        }
        if frags.endings_for(None).is_empty() {
            error("endings", format!("no entries for the default theme {:?}", ThemeKey::DEFAULT));
        }
        if frags.transitions.is_empty() {
            error("transitions", "no transition paragraphs".to_string());
        }
        if frags.titles.is_empty() {
            error("titles", "no title templates".to_string());
        }

        let mut warn = |location: String, message: String| {
            issues.push(ContentIssue {
                severity: Severity::Warning,
                location,
                message,
            })
        };

        if frags.passages.is_empty() {
            warn("passages".to_string(), "no filler passages; stories will be short".to_string());
        }
        for animal in AnimalKey::ALL {
            if frags.beginnings.get(&animal).map_or(true, Vec::is_empty) {
                warn(format!("beginnings.{animal:?}"), "missing, falls back to the default animal".to_string());
            }
        }
        for theme in ThemeKey::ALL {
            for (table, map) in [("middles", &frags.middles), ("endings", &frags.endings)] {
                match map.get(&theme) {
                    None => warn(format!("{table}.{theme:?}"), "missing, falls back to the default theme".to_string()),
                    Some(list) if list.len() < 2 => warn(
                        format!("{table}.{theme:?}"),
                        format!("only {} variant (2 or more recommended)", list.len()),
                    ),
                    Some(_) => {}
                }
            }
        }

        let mut categories: Vec<VocabCategory> = std::iter::once(VocabCategory::CharacterName)
            .chain(VocabCategory::DETAILS)
            .collect();
        categories.sort();
        for category in categories {
            match self.vocabulary.tables.get(&category) {
                None => warn(
                    format!("vocabulary.{category:?}"),
                    format!("missing, every story will use \"{}\"", category.fallback()),
                ),
                Some(VocabularyTable::ByAnimal(map)) if keyed_lookup(map, None, AnimalKey::DEFAULT).is_empty() => warn(
                    format!("vocabulary.{category:?}"),
                    format!("no entries for the default animal {:?}", AnimalKey::DEFAULT),
                ),
                Some(VocabularyTable::ByTheme(map)) if keyed_lookup(map, None, ThemeKey::DEFAULT).is_empty() => warn(
                    format!("vocabulary.{category:?}"),
                    format!("no entries for the default theme {:?}", ThemeKey::DEFAULT),
                ),
                Some(VocabularyTable::Shared(list)) if list.is_empty() => warn(
                    format!("vocabulary.{category:?}"),
                    "empty list".to_string(),
                ),
                Some(_) => {}
            }
        }

        debug!(issues = issues.len(), "linted content pack");
        issues
    }

    /// Fail on the first error-severity lint issue.
    pub fn validate(&self) -> Result<(), ContentError> {
        match self.lint().into_iter().find(|i| i.severity == Severity::Error) {
            Some(issue) => Err(ContentError::Invalid(format!("{}: {}", issue.location, issue.message))),
            None => Ok(()),
        }
    }
}
