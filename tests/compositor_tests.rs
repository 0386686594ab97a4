/// Compositor integration tests — whole stories from the built-in content.

use bedtime_story_engine::core::compositor::{EngineError, SectionKind, StoryEngine};
use bedtime_story_engine::core::content::ContentError;
use bedtime_story_engine::core::dice::{RandomPicker, ScriptedPicker};
use bedtime_story_engine::core::template::Placeholder;
use bedtime_story_engine::schema::story::StoryRequest;
use std::sync::Arc;

fn engine() -> StoryEngine {
    StoryEngine::builder().build().unwrap()
}

/// Rolls for a builtin story: name, title, 16 details, beginning,
/// transition, middle, transition, ending.
fn rolls(detail: usize, middle: usize, ending: usize) -> Vec<usize> {
    let mut rolls = vec![0, 0];
    rolls.extend(std::iter::repeat(detail).take(16));
    rolls.extend([0, 0, middle, 0, ending]);
    rolls
}

#[test]
fn generate_is_total() {
    let engine = engine();
    let animals = ["fox", "FOX", " Owl ", "unicorn", "", "🦄✨", "ドラゴン", "{animalName}"];
    let themes = ["courage", "Dreams", "bravery", "", "💤"];
    let mut seed = 0;
    for animal in animals {
        for theme in themes {
            seed += 1;
            let request = StoryRequest::new("Mia", animal, theme);
            let draft = engine.generate_with(&request, &mut RandomPicker::seeded(seed));
            assert!(!draft.title.is_empty(), "{animal:?}/{theme:?}");
            assert!(!draft.content.is_empty(), "{animal:?}/{theme:?}");
            assert!(!draft.content.contains("undefined"));
            assert_eq!(draft.animal, animal);
            assert_eq!(draft.theme, theme);
        }
    }
}

#[test]
fn no_placeholders_survive() {
    let engine = engine();
    for seed in 0..50 {
        let request = StoryRequest::new("Mia", "elephant", "adventure");
        let draft = engine.generate_with(&request, &mut RandomPicker::seeded(seed));
        assert!(!draft.content.contains('{'), "seed {seed}: {}", draft.content);
        assert!(!draft.title.contains('{'), "seed {seed}: {}", draft.title);
    }
}

#[test]
fn unknown_animal_reads_default_tables() {
    let engine = engine();
    let fox = engine.compose_with(&StoryRequest::new("Mia", "fox", "courage"), &mut ScriptedPicker::first());
    let unicorn =
        engine.compose_with(&StoryRequest::new("Mia", "unicorn", "courage"), &mut ScriptedPicker::first());

    assert_eq!(unicorn.bindings.get(Placeholder::AnimalName), Some("Rusty"));
    assert_eq!(unicorn.bindings.get(Placeholder::Setting), Some("enchanted forest"));
    assert_eq!(
        fox.sections_of(SectionKind::Beginning).collect::<Vec<_>>(),
        unicorn.sections_of(SectionKind::Beginning).collect::<Vec<_>>()
    );
    // The story still calls it a unicorn.
    assert_eq!(unicorn.bindings.get(Placeholder::Animal), Some("Unicorn"));
    assert_eq!(unicorn.bindings.get(Placeholder::AnimalType), Some("unicorn"));
}

#[test]
fn unknown_theme_reads_default_tables() {
    let engine = engine();
    let courage = engine.compose_with(&StoryRequest::new("Mia", "owl", "courage"), &mut ScriptedPicker::first());
    let bravery = engine.compose_with(&StoryRequest::new("Mia", "owl", "bravery"), &mut ScriptedPicker::first());

    for kind in [SectionKind::Middle, SectionKind::Ending] {
        assert_eq!(
            courage.sections_of(kind).collect::<Vec<_>>(),
            bravery.sections_of(kind).collect::<Vec<_>>()
        );
    }
    assert_eq!(bravery.bindings.get(Placeholder::Obstacle), Some("dark ravine"));
    assert_eq!(bravery.bindings.get(Placeholder::Theme), Some("bravery"));
    assert!(bravery.title.contains("bravery"));
}

#[test]
fn details_are_shared_between_sections() {
    let engine = engine();
    let request = StoryRequest::new("Mia", "bear", "courage");
    let composition = engine.compose_with(&request, &mut ScriptedPicker::new(rolls(3, 0, 0)));

    assert_eq!(composition.bindings.get(Placeholder::Obstacle), Some("towering cliff"));
    let middle: Vec<&str> = composition.sections_of(SectionKind::Middle).collect();
    let ending: Vec<&str> = composition.sections_of(SectionKind::Ending).collect();
    assert!(middle[0].contains("towering cliff"));
    assert!(ending[0].contains("towering cliff"));
}

#[test]
fn treasure_items_follow_the_drawn_item() {
    let engine = engine();
    let request = StoryRequest::new("Ada", "fox", "friendship");
    let composition = engine.compose_with(&request, &mut ScriptedPicker::new(rolls(0, 0, 0)));

    assert_eq!(composition.bindings.get(Placeholder::TreasureItem), Some("glowing berry"));
    assert_eq!(composition.bindings.get(Placeholder::TreasureItems), Some("glowing berries"));
    let middle: Vec<&str> = composition.sections_of(SectionKind::Middle).collect();
    assert!(middle[0].contains("glowing berries"));
    assert!(middle[0].contains("best glowing berry"));
}

#[test]
fn story_has_every_section_in_order() {
    let engine = engine();
    let request = StoryRequest::new("Mia", "fox", "courage");
    let composition = engine.compose_with(&request, &mut ScriptedPicker::first());
    let kinds: Vec<SectionKind> = composition.sections.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Beginning,
            SectionKind::Transition,
            SectionKind::Middle,
            SectionKind::Transition,
            SectionKind::Passage,
            SectionKind::Passage,
            SectionKind::Passage,
            SectionKind::Passage,
            SectionKind::Ending,
        ]
    );
}

#[test]
fn default_story_is_long_enough() {
    let engine = engine();
    let request = StoryRequest::new("Mia", "fox", "courage");
    for seed in 0..10 {
        let composition = engine.compose_with(&request, &mut RandomPicker::seeded(seed));
        let content = composition.content();
        assert!(content.split("\n\n").count() >= 8);
        assert!(content.matches("Mia").count() >= 2);
        let name = composition.bindings.get(Placeholder::AnimalName).unwrap();
        assert!(content.contains(name));
        assert!(!content.contains("Special message"));
        assert!(!content.contains('{'), "unresolved slot in: {content}");
        assert!(!content.contains("undefined"));
    }
}

#[test]
fn custom_message_footer() {
    let engine = engine();
    let request = StoryRequest::new("Leo", "unicorn", "courage").with_message("Sweet dreams!");
    let draft = engine.generate(&request);
    assert!(draft.content.ends_with("\n\nSpecial message for Leo: Sweet dreams!"));
    assert_eq!(draft.paragraphs().last(), Some("Special message for Leo: Sweet dreams!"));
    assert_eq!(draft.custom_message, "Sweet dreams!");
}

#[test]
fn draft_metadata() {
    let engine = engine();
    let draft = engine.generate(&StoryRequest::new("Mia", "dolphin", "kindness"));
    assert_eq!(draft.language, "en");
    assert_eq!(draft.image_url, None);
    assert_eq!(draft.child_name, "Mia");

    let draft = engine.generate(&StoryRequest::new("Mia", "dolphin", "kindness").with_language("id"));
    assert_eq!(draft.language, "id");
}

#[test]
fn builtin_story_takes_twenty_three_draws() {
    let engine = engine();
    let mut picker = ScriptedPicker::first();
    engine.compose_with(&StoryRequest::new("Mia", "rabbit", "dreams"), &mut picker);
    assert_eq!(picker.draws(), 23);
}

#[test]
fn seeded_generation_is_reproducible() {
    let engine = engine();
    let request = StoryRequest::new("Mia", "owl", "adventure");
    let a = engine.generate_with(&request, &mut RandomPicker::seeded(99));
    let b = engine.generate_with(&request, &mut RandomPicker::seeded(99));
    assert_eq!(a, b);
}

#[test]
fn random_generation_varies() {
    let engine = engine();
    let request = StoryRequest::new("Mia", "fox", "courage");
    let stories: std::collections::HashSet<String> =
        (0..10).map(|_| engine.generate(&request).content).collect();
    assert!(stories.len() > 1);
}

#[test]
fn engine_is_shared_across_threads() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let request = StoryRequest::new(format!("Child{i}"), "bear", "friendship");
                engine.generate(&request)
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let draft = handle.join().unwrap();
        assert!(draft.content.contains(&format!("Child{i}")));
    }
}

#[test]
fn content_dir_overlays_builtin() {
    let engine = StoryEngine::builder()
        .content_dir("tests/fixtures/fox_only")
        .build()
        .unwrap();
    let composition = engine.compose_with(&StoryRequest::new("Mia", "fox", "courage"), &mut RandomPicker::seeded(3));
    assert_eq!(composition.bindings.get(Placeholder::AnimalName), Some("Tester"));
    assert_eq!(composition.bindings.get(Placeholder::Souvenir), Some("test pebble"));
    assert_eq!(
        composition.sections_of(SectionKind::Beginning).collect::<Vec<_>>(),
        vec!["Tester the test fox begins the story for Mia."]
    );

    let owl = engine.compose_with(&StoryRequest::new("Mia", "owl", "courage"), &mut RandomPicker::seeded(3));
    assert_ne!(owl.bindings.get(Placeholder::AnimalName), Some("Tester"));
}

#[test]
fn named_packs_load_from_data_root() {
    let engine = StoryEngine::builder()
        .data_root("tests/fixtures")
        .content_packs(&["fox_only", "missing_pack"])
        .build()
        .unwrap();
    let draft = engine.generate(&StoryRequest::new("Mia", "fox", "kindness"));
    assert!(draft.content.starts_with("Tester the test fox"));
}

#[test]
fn broken_pack_is_rejected_at_build() {
    let result = StoryEngine::builder()
        .content_dir("tests/fixtures/broken")
        .build();
    assert!(matches!(result, Err(EngineError::Content(ContentError::Invalid(_)))));
}
