use std::{env, fs, process};

use redline_text::{BuildOptions, ChangeRequest, ReconcilePolicy, reconcile_change};
use tracing_subscriber::EnvFilter;

/// Redlines a file against an edited markdown version of it and prints the
/// resulting WordprocessingML fragment.
///
/// Run it with:
/// `RUST_LOG=debug cargo run --example redline-file original.txt proposed.md [author]`
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: redline-file <original> <proposed> [author]");
        process::exit(1);
    }

    let read = |path: &str| {
        fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {path}: {e}");
            process::exit(1);
        })
    };

    let original = read(&args[1]);
    let proposed = read(&args[2]);

    let mut options = BuildOptions::default();
    if let Some(author) = args.get(3) {
        options = options.with_author(author);
    }

    let request = ChangeRequest::new(args[1].as_str(), original.trim_end(), proposed.trim_end());
    let fragment = reconcile_change(&request, &options, &ReconcilePolicy::default());

    if !fragment.has_changes {
        eprintln!("Nothing to change");
        return;
    }

    if let Some(strategy) = fragment.strategy_used {
        eprintln!("Strategy: {strategy}");
    }
    for record in &fragment.records {
        eprintln!("  {record}");
    }
    if let Some(numbering) = &fragment.numbering_markup {
        println!("{numbering}");
    }
    println!("{}", fragment.markup);
}
