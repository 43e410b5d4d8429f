//! gosummarize CLI - Summarize the exported API of a Go codebase.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use gosummarize::builder::Summarizer;
use gosummarize::errors::{exit_code, SummarizeError};
use gosummarize::output::OutputFormat;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gosummarize")]
#[command(about = "Summarize the exported declarations of Go source files")]
#[command(version)]
struct Cli {
    /// Root directory to scan
    directory: PathBuf,

    /// Ignore test files (files ending with _test.go)
    #[arg(short = 't', long)]
    exclude_tests: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Parse files in parallel (output order is unchanged)
    #[arg(long)]
    parallel: bool,

    /// Respect .gitignore files
    #[arg(long)]
    gitignore: bool,

    /// Skip hidden files and directories
    #[arg(long)]
    no_hidden: bool,

    /// Maximum directory depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Skip files whose path relative to the root matches this glob
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let json_output = cli.json;

    if let Err(e) = run(cli) {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), SummarizeError> {
    let mut summarizer = Summarizer::new(cli.directory)
        .exclude_tests(cli.exclude_tests)
        .respect_gitignore(cli.gitignore)
        .include_hidden(!cli.no_hidden)
        .parallel(cli.parallel)
        .format(if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        });

    if let Some(depth) = cli.max_depth {
        summarizer = summarizer.max_depth(depth);
    }
    for pattern in cli.exclude {
        summarizer = summarizer.exclude(pattern);
    }

    let files = summarizer.discover()?;

    if files.is_empty() {
        println!("No Go files found in the specified directory or its subdirectories");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    summarizer.summarize(&files, &mut out, |err| eprintln!("{err}"))?;
    out.flush()?;

    Ok(())
}
