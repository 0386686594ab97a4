/// Character names and story titles.

use crate::core::content::{FragmentLibrary, VocabCategory, Vocabulary};
use crate::core::dice::{choose, Picker};
use crate::core::template::{Bindings, Placeholder};
use crate::schema::keys::{AnimalKey, ThemeKey};

/// The caller's animal and theme, resolved to content keys where possible.
///
/// The words are kept so a story about a "unicorn" still calls it a unicorn
/// while drawing its details from the default animal's tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryTerms {
    pub animal: Option<AnimalKey>,
    pub theme: Option<ThemeKey>,
    /// Trimmed, lower-cased animal word.
    pub animal_word: String,
    /// Trimmed, lower-cased theme word.
    pub theme_word: String,
}

impl StoryTerms {
    pub fn new(animal: &str, theme: &str) -> Self {
        Self {
            animal: AnimalKey::parse(animal),
            theme: ThemeKey::parse(theme),
            animal_word: animal.trim().to_lowercase(),
            theme_word: theme.trim().to_lowercase(),
        }
    }

    /// The animal word with its first letter capitalised: "Fox", "Unicorn".
    pub fn animal_title(&self) -> String {
        capitalize(&self.animal_word)
    }

    /// "Courage" for known themes, the caller's own word otherwise.
    pub fn theme_title(&self) -> String {
        match self.theme {
            Some(theme) => theme.label().to_string(),
            None => self.theme_word.clone(),
        }
    }
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Pick the animal character's name. Names repeat freely across stories.
pub fn pick_character_name<P: Picker + ?Sized>(
    vocabulary: &Vocabulary,
    animal: Option<AnimalKey>,
    picker: &mut P,
) -> String {
    vocabulary.draw(VocabCategory::CharacterName, animal, None, picker)
}

/// Pick and fill a title template.
///
/// `{setting}` in a title is always the first setting listed for the
/// animal, not the one the story body draws.
pub fn pick_title<P: Picker + ?Sized>(
    fragments: &FragmentLibrary,
    vocabulary: &Vocabulary,
    terms: &StoryTerms,
    child_name: &str,
    character_name: &str,
    picker: &mut P,
) -> String {
    let Some(template) = choose(picker, &fragments.titles) else {
        return format!("{child_name}'s Adventure with {character_name}");
    };

    let bindings = Bindings::new()
        .with(Placeholder::AnimalName, character_name)
        .with(Placeholder::ChildName, child_name)
        .with(Placeholder::Theme, terms.theme_title())
        .with(Placeholder::Animal, terms.animal_title())
        .with(
            Placeholder::Setting,
            vocabulary.first(VocabCategory::Setting, terms.animal, terms.theme),
        );
    bindings.render(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::ContentPack;
    use crate::core::dice::ScriptedPicker;

    fn pack() -> ContentPack {
        ContentPack::parse_ron(
            r#"Fragments(titles: [
                "{animalName} and {childName}'s {theme} Adventure",
                "{theme} in the {setting}: {childName} and the {animal}",
            ])"#,
            r#"{
                CharacterName: ByAnimal({ Fox: ["Ember", "Rusty"], Owl: ["Hoot"] }),
                Setting: ByAnimal({ Fox: ["autumn woods", "misty hollow"], Owl: ["starlit grove"] }),
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn terms_keep_caller_words() {
        let terms = StoryTerms::new(" Unicorn ", "Courage");
        assert_eq!(terms.animal, None);
        assert_eq!(terms.theme, Some(ThemeKey::Courage));
        assert_eq!(terms.animal_word, "unicorn");
        assert_eq!(terms.animal_title(), "Unicorn");
        assert_eq!(terms.theme_title(), "Courage");

        let terms = StoryTerms::new("fox", "bravery");
        assert_eq!(terms.theme_title(), "bravery");
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("owl"), "Owl");
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn character_name_falls_back_to_fox() {
        let pack = pack();
        let mut picker = ScriptedPicker::new([1]);
        let name = pick_character_name(&pack.vocabulary, AnimalKey::parse("unicorn"), &mut picker);
        assert_eq!(name, "Rusty");

        let mut picker = ScriptedPicker::first();
        let name = pick_character_name(&pack.vocabulary, Some(AnimalKey::Owl), &mut picker);
        assert_eq!(name, "Hoot");
    }

    #[test]
    fn title_fills_every_slot() {
        let pack = pack();
        let terms = StoryTerms::new("fox", "friendship");
        let mut picker = ScriptedPicker::new([0]);
        let title = pick_title(&pack.fragments, &pack.vocabulary, &terms, "Mia", "Ember", &mut picker);
        assert_eq!(title, "Ember and Mia's Friendship Adventure");
    }

    #[test]
    fn title_setting_is_first_listed() {
        let pack = pack();
        let terms = StoryTerms::new("owl", "dreams");
        for _ in 0..5 {
            let mut picker = ScriptedPicker::new([1]);
            let title = pick_title(&pack.fragments, &pack.vocabulary, &terms, "Leo", "Hoot", &mut picker);
            assert_eq!(title, "Dreams in the starlit grove: Leo and the Owl");
        }

        let terms = StoryTerms::new("fox", "courage");
        let mut picker = ScriptedPicker::new([1]);
        let title = pick_title(&pack.fragments, &pack.vocabulary, &terms, "Leo", "Ember", &mut picker);
        assert_eq!(title, "Courage in the autumn woods: Leo and the Fox");
    }

    #[test]
    fn title_without_templates() {
        let pack = ContentPack::default();
        let terms = StoryTerms::new("fox", "courage");
        let mut picker = ScriptedPicker::first();
        let title = pick_title(&pack.fragments, &pack.vocabulary, &terms, "Mia", "Ember", &mut picker);
        assert_eq!(title, "Mia's Adventure with Ember");
        assert_eq!(picker.draws(), 0);
    }
}
