//! Lookup Config CLI
//!
//! View and manage family lookup configuration.

use clap::{Parser, Subcommand};
use family_lookup::LookupConfig;

#[derive(Parser)]
#[command(name = "family-lookup-config")]
#[command(about = "View and manage family lookup configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Show {
        /// Config file to load (optional)
        #[arg(short, long)]
        config: Option<String>,

        /// Output as TOML
        #[arg(long)]
        toml: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path (default: family-lookup.toml)
        #[arg(short, long, default_value = "family-lookup.toml")]
        output: String,
    },

    /// Validate configuration
    Validate {
        /// Config file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show { config, toml, json } => {
            let cfg = LookupConfig::load_from(config.as_deref())?;

            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
            } else if toml {
                println!("{}", ::toml::to_string_pretty(&cfg)?);
            } else {
                println!("📋 Family Lookup Configuration\n");
                println!("Data:");
                println!("  Path: {:?}", cfg.data.path);
                println!("  Delimiter: {:?}", cfg.data.delimiter);
                println!("  Encodings: {}", cfg.data.encodings.join(", "));

                println!("\nIdentity:");
                println!("  Aliases: {}", cfg.identity.aliases.join(", "));
                println!("  Term: {}", cfg.identity.term);

                println!("\nDisplay:");
                println!("  Title: {}", cfg.display.title);
                println!("  Logo: {:?}", cfg.display.logo_path);
                println!("  Contact: {}", cfg.display.contact_message);
            }
        }

        Commands::Init { output } => {
            let cfg = LookupConfig::default();
            cfg.save(&output)?;
            println!("✅ Created config file: {}", output);
        }

        Commands::Validate { config } => match LookupConfig::load_from(config.as_deref()) {
            Ok(cfg) => {
                let problems = cfg.validate();
                if !problems.is_empty() {
                    for problem in &problems {
                        eprintln!("❌ {}", problem);
                    }
                    std::process::exit(1);
                }
                println!("✅ Configuration is valid");
                println!("   Data: {:?}", cfg.data.path);
                println!("   Encodings: {}", cfg.data.encodings.len());
                println!("   Identity aliases: {}", cfg.identity.aliases.len());
            }
            Err(e) => {
                eprintln!("❌ Configuration error: {}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
