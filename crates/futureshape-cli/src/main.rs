// Copyright 2026 Futureshape Contributors
// SPDX-License-Identifier: Apache-2.0

//! Futureshape CLI entry point.

mod doctor;
mod majors_cmd;
mod search_cmd;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use futureshape::config::resolve_region_data_path;
use futureshape::RegionIndex;

#[derive(Parser)]
#[command(
    name = "futureshape",
    about = "Compare scholarships, universities, living costs and equality scores across two US regions",
    version
)]
struct Cli {
    /// Path to the region gazetteer CSV.
    #[arg(long, global = true)]
    regions: Option<String>,

    /// Path to a source table JSON overriding the built-in one.
    #[arg(long, global = true)]
    sources: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full comparison and print the report as JSON.
    Search {
        /// Region the student wants to study in ("Miami, Florida").
        #[arg(long)]
        target: Option<String>,

        /// Region the student lives in now.
        #[arg(long)]
        current: Option<String>,

        /// Field of study ("computer science").
        #[arg(long)]
        major: Option<String>,

        /// Also collect the state equality profile.
        #[arg(long)]
        equality: bool,

        /// Print live status events to stderr.
        #[arg(long)]
        progress: bool,
    },

    /// Resolve free text to a region record.
    Resolve {
        /// Text to resolve ("Buffalo NY").
        text: String,
    },

    /// Flatten a College Board major listing into a catalog file.
    Majors {
        /// College Board listing JSON.
        input: String,
        /// Where to write the catalog.
        output: String,
    },

    /// Check browser and data availability.
    Doctor,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   futureshape completions bash > ~/.local/share/bash-completion/completions/futureshape
    ///   futureshape completions zsh > ~/.zfunc/_futureshape
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            target,
            current,
            major,
            equality,
            progress,
        } => {
            let args = search_cmd::SearchArgs {
                target,
                current,
                major,
                equality,
                progress,
            };
            search_cmd::run(cli.regions.as_deref(), cli.sources.as_deref(), args).await?;
        }

        Commands::Resolve { text } => {
            let path = resolve_region_data_path(cli.regions.as_deref());
            let index = RegionIndex::load(&path)?;
            println!("{}", serde_json::to_string_pretty(&index.resolve(&text))?);
        }

        Commands::Majors { input, output } => {
            majors_cmd::run(&input, &output)?;
        }

        Commands::Doctor => {
            doctor::run(cli.regions.as_deref(), cli.sources.as_deref());
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "futureshape", &mut std::io::stdout());
        }
    }

    Ok(())
}
