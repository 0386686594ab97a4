/// Content Linter — checks a story content pack for authoring mistakes.
///
/// Usage: content_linter <pack_dir> [--standalone]
///
/// By default the pack is merged over the built-in content before linting,
/// which is how the engine would load it. `--standalone` lints the pack on
/// its own.

use bedtime_story_engine::core::content::{ContentPack, Severity};
use std::path::Path;
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
        println!("Usage: content_linter <pack_dir> [--standalone]");
        process::exit(0);
    }

    let pack_dir = Path::new(&args[1]);
    let mut standalone = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--standalone" => standalone = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    if !pack_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", pack_dir.display());
        process::exit(1);
    }

    let overlay = match ContentPack::load_from_dir(pack_dir) {
        Ok(pack) => pack,
        Err(e) => {
            eprintln!("ERROR: Failed to load content pack: {}", e);
            process::exit(1);
        }
    };

    let pack = if standalone {
        overlay
    } else {
        match ContentPack::builtin() {
            Ok(mut base) => {
                base.merge(overlay);
                base
            }
            Err(e) => {
                eprintln!("ERROR: Built-in content failed to load: {}", e);
                process::exit(1);
            }
        }
    };

    println!(
        "Loaded {} templates and {} vocabulary tables",
        pack.fragments.templates().len(),
        pack.vocabulary.tables.len()
    );

    let issues = pack.lint();

    println!("\n=== Content Lint Report ===\n");

    if issues.is_empty() {
        println!("All checks passed!");
    }

    for issue in &issues {
        println!("{}", issue);
    }

    let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
    println!(
        "\nSummary: {} errors, {} warnings",
        errors,
        issues.len() - errors
    );

    if errors == 0 {
        process::exit(0);
    } else {
        process::exit(1);
    }
}
