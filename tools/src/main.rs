mod encode;
mod guess;
mod inspect;
mod options;

use anyhow::{Context, Result};
use bmpm_rules::Encoder;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use options::EngineArgs;

#[derive(Parser)]
#[command(name = "bmpm", version, about = "Beider-Morse phonetic matching")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode names (from arguments, or one per line on stdin)
    Encode {
        #[command(flatten)]
        engine: EngineArgs,

        /// Skip language guessing and use these languages (comma separated)
        #[arg(long)]
        languages: Option<String>,

        /// Print a JSON array of {name, encoding} objects
        #[arg(long)]
        json: bool,

        names: Vec<String>,
    },
    /// Show the languages guessed for each word
    Guess {
        #[command(flatten)]
        engine: EngineArgs,

        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Summarize the rules found in a directory
    Inspect {
        #[arg(long, env = "BMPM_RULES_DIR")]
        rules_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Encode {
            engine,
            languages,
            json,
            names,
        } => {
            let (_, engine) = engine.build()?;
            encode::run(&engine, names, languages.as_deref(), json)?;
        }
        Command::Guess { engine, words } => {
            let (_, engine) = engine.build()?;
            guess::run(&engine, &words)?;
        }
        Command::Inspect { rules_dir } => {
            let encoder = Encoder::load(&rules_dir)
                .with_context(|| format!("failed to load rules from {}", rules_dir.display()))?;
            inspect::run(encoder.rules())?;
        }
    }
    Ok(())
}
