/// Bedtime example — a week of stories for one child.
///
/// Writes one story per night, cycling through the animals and themes,
/// stores each one, then browses the shelf by animal and by theme.
///
/// Run with: cargo run --example bedtime

use bedtime_story_engine::core::compositor::StoryEngine;
use bedtime_story_engine::schema::keys::{AnimalKey, ThemeKey};
use bedtime_story_engine::schema::story::StoryRequest;
use bedtime_story_engine::service::StoryService;
use bedtime_story_engine::store::MemoryStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let engine = StoryEngine::builder()
        .build()
        .expect("Failed to build engine");
    let service = StoryService::new(engine, MemoryStore::new());

    let nights = [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ];

    for (i, night) in nights.iter().enumerate() {
        let animal = AnimalKey::ALL[i % AnimalKey::ALL.len()];
        let theme = ThemeKey::ALL[i % ThemeKey::ALL.len()];
        let mut request = StoryRequest::new("Mia", animal.as_str(), theme.as_str());
        if *night == "Sunday" {
            request = request.with_message("Sleep tight, see you in the morning!");
        }

        let story = service
            .create_story(&request)
            .expect("Failed to create story");

        println!("--- {} ({} / {}) ---", night, animal.label(), theme.label());
        println!("{}\n", story.title);
        let opening = story.content.split("\n\n").next().unwrap_or("");
        println!("{}\n", opening);
    }

    // The last story in full.
    let shelf = service.list_stories().expect("Failed to list stories");
    if let Some(latest) = shelf.first() {
        println!("=== Tonight's story: {} ===\n", latest.title);
        println!("{}\n", latest.content);
    }

    println!("=== The shelf ===");
    for animal in AnimalKey::ALL {
        let stories = service
            .list_by_animal(animal.as_str())
            .expect("Failed to list stories");
        println!("{:>9}: {} stories", animal.label(), stories.len());
    }
    for theme in ThemeKey::ALL {
        let stories = service
            .list_by_theme(theme.as_str())
            .expect("Failed to list stories");
        println!("{:>10}: {} stories", theme.label(), stories.len());
    }
}
