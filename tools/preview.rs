/// Preview — generate bedtime stories from the command line.
///
/// Usage: preview --child <name> --animal <animal> --theme <theme>
///                [--message <text>] [--seed <n>] [--count <n>] [--json]
///                [--content <dir>]
///
/// With `--count` above 1, prints variety statistics after the stories.

use bedtime_story_engine::core::compositor::StoryEngine;
use bedtime_story_engine::core::dice::RandomPicker;
use bedtime_story_engine::schema::keys::{AnimalKey, ThemeKey};
use bedtime_story_engine::schema::story::{StoryDraft, StoryRequest};
use std::collections::{HashMap, HashSet};
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut child = None;
    let mut animal = None;
    let mut theme = None;
    let mut message = String::new();
    let mut seed: Option<u64> = None;
    let mut count: usize = 1;
    let mut json = false;
    let mut content_dir = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--child" if i + 1 < args.len() => {
                i += 1;
                child = Some(args[i].clone());
            }
            "--animal" if i + 1 < args.len() => {
                i += 1;
                animal = Some(args[i].clone());
            }
            "--theme" if i + 1 < args.len() => {
                i += 1;
                theme = Some(args[i].clone());
            }
            "--message" if i + 1 < args.len() => {
                i += 1;
                message = args[i].clone();
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().ok();
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                count = args[i].parse().unwrap_or(1).max(1);
            }
            "--content" if i + 1 < args.len() => {
                i += 1;
                content_dir = Some(args[i].clone());
            }
            "--json" => json = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let request = StoryRequest::new(
        child.unwrap_or_default(),
        animal.unwrap_or_else(|| AnimalKey::DEFAULT.as_str().to_string()),
        theme.unwrap_or_else(|| ThemeKey::DEFAULT.as_str().to_string()),
    )
    .with_message(message);

    if let Err(e) = request.validate() {
        eprintln!("ERROR: {}", e);
        process::exit(1);
    }

    let mut builder = StoryEngine::builder();
    if let Some(ref dir) = content_dir {
        builder = builder.content_dir(dir);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: Engine build error: {}", e);
            process::exit(1);
        }
    };

    let drafts: Vec<StoryDraft> = match seed {
        Some(seed) => {
            let mut picker = RandomPicker::seeded(seed);
            (0..count).map(|_| engine.generate_with(&request, &mut picker)).collect()
        }
        None => (0..count).map(|_| engine.generate(&request)).collect(),
    };

    if json {
        match serde_json::to_string_pretty(&drafts) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("ERROR: Serialization error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for draft in &drafts {
        println!("=== {} ===\n", draft.title);
        println!("{}\n", draft.content);
    }

    if drafts.len() > 1 {
        print_variety(&drafts);
    }
}

fn print_variety(drafts: &[StoryDraft]) {
    println!("=== Variety: {} stories ===\n", drafts.len());

    let titles: HashSet<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
    println!("Unique titles: {} / {}", titles.len(), drafts.len());

    let openings: HashSet<&str> = drafts
        .iter()
        .map(|d| d.paragraphs().next().unwrap_or(""))
        .collect();
    println!("Unique openings: {} / {}", openings.len(), drafts.len());

    let avg_words = drafts
        .iter()
        .map(|d| d.content.split_whitespace().count() as f64)
        .sum::<f64>()
        / drafts.len() as f64;
    println!("Average length: {:.0} words", avg_words);

    let mut word_counts: HashMap<String, u32> = HashMap::new();
    for draft in drafts {
        for word in draft.content.split_whitespace() {
            let clean = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if clean.len() > 3 {
                *word_counts.entry(clean).or_insert(0) += 1;
            }
        }
    }
    let mut word_freq: Vec<(String, u32)> = word_counts.into_iter().collect();
    word_freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("\nTop 10 words:");
    for (word, count) in word_freq.iter().take(10) {
        println!("  {}: {}", word, count);
    }
    println!();
}

fn print_usage() {
    println!("Preview — generate bedtime stories from the command line.");
    println!();
    println!("Usage: preview --child <name> --animal <animal> --theme <theme> [options]");
    println!();
    println!("  --child <name>     The child the story is for (required)");
    println!("  --animal <animal>  Animal companion (default: fox)");
    println!("  --theme <theme>    Story theme (default: courage)");
    println!("  --message <text>   Closing message for the child");
    println!("  --seed <n>         Seed for reproducible stories");
    println!("  --count <n>        Number of stories to write (default: 1)");
    println!("  --json             Print stories as JSON");
    println!("  --content <dir>    Content pack merged over the built-in stories");
    println!();
    let animals: Vec<&str> = AnimalKey::ALL.iter().map(|a| a.as_str()).collect();
    let themes: Vec<&str> = ThemeKey::ALL.iter().map(|t| t.as_str()).collect();
    println!("Animals: {}", animals.join(", "));
    println!("Themes: {}", themes.join(", "));
}
