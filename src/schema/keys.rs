use serde::{Deserialize, Serialize};

/// The animals the content library is written for.
///
/// Every animal-keyed table falls back to [`AnimalKey::DEFAULT`] on its own
/// when an entry is missing, so callers may pass any string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimalKey {
    Fox,
    Rabbit,
    Owl,
    Bear,
    Dolphin,
    Elephant,
}

impl AnimalKey {
    pub const DEFAULT: AnimalKey = AnimalKey::Fox;

    pub const ALL: [AnimalKey; 6] = [
        AnimalKey::Fox,
        AnimalKey::Rabbit,
        AnimalKey::Owl,
        AnimalKey::Bear,
        AnimalKey::Dolphin,
        AnimalKey::Elephant,
    ];

    /// Case-insensitive lookup of a caller-supplied animal word.
    /// Returns `None` for anything outside the closed set.
    pub fn parse(input: &str) -> Option<AnimalKey> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(input))
    }

    /// The lowercase identifier, e.g. "fox".
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fox => "fox",
            Self::Rabbit => "rabbit",
            Self::Owl => "owl",
            Self::Bear => "bear",
            Self::Dolphin => "dolphin",
            Self::Elephant => "elephant",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fox => "Fox",
            Self::Rabbit => "Rabbit",
            Self::Owl => "Owl",
            Self::Bear => "Bear",
            Self::Dolphin => "Dolphin",
            Self::Elephant => "Elephant",
        }
    }

    /// One-line blurb shown next to the animal in pickers.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Fox => "Quick-witted and curious, always one step ahead.",
            Self::Rabbit => "Soft and speedy, with ears that catch every whisper.",
            Self::Owl => "Patient and wise, keeper of the night sky.",
            Self::Bear => "Big and gentle, with the warmest heart in the woods.",
            Self::Dolphin => "Playful and bright, full of songs from the sea.",
            Self::Elephant => "Calm and kind, with a memory for every story.",
        }
    }
}

/// The lesson a story is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThemeKey {
    Courage,
    Friendship,
    Adventure,
    Kindness,
    Dreams,
}

impl ThemeKey {
    pub const DEFAULT: ThemeKey = ThemeKey::Courage;

    pub const ALL: [ThemeKey; 5] = [
        ThemeKey::Courage,
        ThemeKey::Friendship,
        ThemeKey::Adventure,
        ThemeKey::Kindness,
        ThemeKey::Dreams,
    ];

    /// Case-insensitive lookup of a caller-supplied theme word.
    pub fn parse(input: &str) -> Option<ThemeKey> {
        let input = input.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(input))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Courage => "courage",
            Self::Friendship => "friendship",
            Self::Adventure => "adventure",
            Self::Kindness => "kindness",
            Self::Dreams => "dreams",
        }
    }

    /// Human-readable form used in titles: "Courage", "Friendship", ...
    pub fn label(&self) -> &'static str {
        match self {
            Self::Courage => "Courage",
            Self::Friendship => "Friendship",
            Self::Adventure => "Adventure",
            Self::Kindness => "Kindness",
            Self::Dreams => "Dreams",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Courage => "Stories about being brave and facing fears",
            Self::Friendship => "Stories about making friends and sharing",
            Self::Adventure => "Stories about exploring new places and discovering wonders",
            Self::Kindness => "Stories about helping others and showing compassion",
            Self::Dreams => "Stories about imagination and making wishes come true",
        }
    }
}
