//! Command line argument parsing for the Palaver CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::PalaverConfig;
use crate::error::Result;

/// Palaver - an intent-matching chatbot
#[derive(Parser, Debug, Clone)]
#[command(name = "palaver")]
#[command(about = "An intent-matching chatbot trained from a JSON corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PalaverArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "PALAVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Intent corpus, overriding the configuration
    #[arg(long, value_name = "CORPUS_FILE")]
    pub corpus: Option<PathBuf>,

    /// Conversation log, overriding the configuration
    #[arg(long, value_name = "LOG_FILE")]
    pub chat_log: Option<PathBuf>,

    /// Neither read nor write the model cache
    #[arg(long)]
    pub no_cache: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PalaverArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }

    /// Load the configuration file, if any, and apply command line overrides.
    pub fn load_config(&self) -> Result<PalaverConfig> {
        let mut config = match &self.config {
            Some(path) => PalaverConfig::from_file(path)?,
            None => PalaverConfig::default(),
        };

        if let Some(corpus) = &self.corpus {
            config.paths.corpus = corpus.clone();
        }
        if let Some(chat_log) = &self.chat_log {
            config.paths.chat_log = chat_log.clone();
        }
        if self.no_cache {
            config.cache.enabled = false;
        }

        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Chat interactively, one turn per input line
    Chat(ChatArgs),

    /// Send a single message and print the reply
    Ask(AskArgs),

    /// Show the logged conversation
    History(HistoryArgs),

    /// Retrain the classifier and rewrite the model cache
    Train(TrainArgs),

    /// Classify every corpus pattern and report the accuracy
    Evaluate(EvaluateArgs),

    /// List the intents in the corpus
    Intents(IntentsArgs),
}

/// Arguments for interactive chat
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Prompt shown before each input line
    #[arg(long, default_value = "You: ")]
    pub prompt: String,

    /// Show the predicted tag next to each reply
    #[arg(long)]
    pub show_tag: bool,
}

/// Arguments for a single message
#[derive(Parser, Debug, Clone)]
pub struct AskArgs {
    /// Message text; multiple words are joined with spaces
    #[arg(value_name = "TEXT", required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl AskArgs {
    /// The message as one string
    pub fn message(&self) -> String {
        self.text.join(" ")
    }
}

/// Arguments for showing history
#[derive(Parser, Debug, Clone)]
pub struct HistoryArgs {
    /// Only show the most recent N exchanges
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Arguments for retraining
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Also report training accuracy
    #[arg(long)]
    pub evaluate: bool,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Exit with an error if accuracy is below this fraction
    #[arg(long, value_name = "FRACTION")]
    pub min_accuracy: Option<f64>,
}

/// Arguments for listing intents
#[derive(Parser, Debug, Clone)]
pub struct IntentsArgs {
    /// Show patterns and responses
    #[arg(short, long)]
    pub long: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
