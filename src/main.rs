use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use topicbridge::config::Config;
use topicbridge::model::snapshot::ModelSnapshot;
use topicbridge::model::{store, LanguageHintInput, TopicModelContainer};
use topicbridge::output::terminal;

/// topicbridge: turn fitted topic models into validated containers.
///
/// Reads a JSON dump of a fitted model, checks that every array agrees on
/// vocabulary size, topic count and document count, and writes a container
/// that downstream tooling can load without re-checking.
#[derive(Parser)]
#[command(name = "topicbridge", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a fitted-model dump into a container
    Convert {
        /// JSON dump of the fitted model
        input: PathBuf,

        /// Where to write the container JSON
        output: PathBuf,

        /// Language tag for the vocabulary (e.g. en)
        #[arg(long)]
        language: Option<String>,

        /// Normalize topic and document distributions to sum to 1
        #[arg(long)]
        normalize: bool,
    },

    /// Show the heaviest words of every topic
    Show {
        /// Container JSON written by `convert`
        container: PathBuf,

        /// Words per topic (default: 10, or TOPICBRIDGE_TOP_N)
        #[arg(long)]
        top: Option<usize>,
    },

    /// Summarize a container's shape and topic statistics
    Inspect {
        /// Container JSON written by `convert`
        container: PathBuf,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicbridge=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            language,
            normalize,
        } => {
            let snapshot = ModelSnapshot::load(&input)?;
            let language = LanguageHintInput::from(language.or(config.default_language));

            let mut model = TopicModelContainer::build(&snapshot, language)
                .with_context(|| format!("Cannot convert {}", input.display()))?;
            if normalize || config.normalize {
                info!("Normalizing topic and document distributions");
                model = model.normalize();
            }

            store::save_json(&model, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "Converted {} topics over {} terms and {} documents.",
                model.topic_count(),
                model.vocabulary_size(),
                model.document_count()
            );
            println!("Container written to: {}", output.display());
            println!(
                "{}",
                format!("To view it, run: topicbridge show {}", output.display()).dimmed()
            );
        }

        Commands::Show { container, top } => {
            let model = store::load_json(&container)
                .with_context(|| format!("Failed to load {}", container.display()))?;
            terminal::display_topics(&model, top.unwrap_or(config.top_n));
        }

        Commands::Inspect { container } => {
            let model = store::load_json(&container)
                .with_context(|| format!("Failed to load {}", container.display()))?;
            terminal::display_summary(&model);
        }
    }

    Ok(())
}
