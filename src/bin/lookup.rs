//! Family Lookup CLI
//!
//! Looks up registry records by national ID.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use family_lookup::report::{render_banner, render_json, render_text};
use family_lookup::{query, DatasetCache, LookupConfig, QueryOutcome};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "family-lookup")]
#[command(about = "Look up family registry records by national ID")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Registry file, overriding the configured path
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a single national ID
    Search {
        /// National ID to look up
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prompt for national IDs until EOF or "exit"
    Interactive,

    /// Summarize the loaded registry
    Info,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config =
        LookupConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if let Some(data) = cli.data {
        config.data.path = data;
    }
    let options = config.load_options().context("invalid configuration")?;
    let path = config.data_path();
    let cache = DatasetCache::global();

    match cli.command {
        Commands::Search { id, json } => {
            let Some(outcome) = query(cache, &path, &options, &id) else {
                eprintln!("⚠️  أدخل رقم الهوية للبحث");
                return Ok(2);
            };
            if json {
                println!("{}", render_json(&outcome)?);
            } else {
                println!("{}", render_text(&outcome, &config.display));
            }
            Ok(exit_code(&outcome))
        }

        Commands::Interactive => {
            println!("{}", render_banner(&config));
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            loop {
                print!("🔎 أدخل رقم الهوية للبحث: ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    println!();
                    break;
                };
                let line = line?;
                if line.trim() == "exit" {
                    break;
                }
                if let Some(outcome) = query(cache, &path, &options, &line) {
                    println!("{}\n", render_text(&outcome, &config.display));
                }
            }
            println!("{}", config.display.footer);
            Ok(0)
        }

        Commands::Info => match cache.get_or_load(&path, &options) {
            Ok(dataset) => {
                let summary = dataset.summary();
                println!("📊 Registry: {}", path.display());
                println!("  Encoding: {}", summary.encoding);
                println!("  Records: {}", dataset.len());
                println!("  Skipped rows: {}", summary.skipped_rows);
                println!("  Identity column: {}", summary.identity_header);
                println!("  Columns:");
                for header in dataset.headers() {
                    println!("    - {}", header);
                }
                Ok(0)
            }
            Err(e) => {
                println!("{}", render_text(&QueryOutcome::from(&e), &config.display));
                Ok(1)
            }
        },
    }
}

fn exit_code(outcome: &QueryOutcome) -> i32 {
    match outcome {
        QueryOutcome::Found(_) => 0,
        QueryOutcome::NotFound { .. } => 2,
        QueryOutcome::LoadFailed { .. } => 1,
    }
}
