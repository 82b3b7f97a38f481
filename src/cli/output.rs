//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, PalaverArgs};
use crate::conversation::ConversationRecord;
use crate::engine::Exchange;
use crate::error::Result;
use crate::ml::evaluation::Evaluation;

/// Shown when the log file does not exist yet.
pub const NO_HISTORY_FOUND: &str = "No chat history found. Start chatting to create one!";

/// Shown when the log file holds only its header.
pub const NO_HISTORY_AVAILABLE: &str = "No chat history available.";

/// Result structure for the logged conversation.
#[derive(Debug, Serialize)]
pub struct HistoryResult {
    /// Whether the log file exists.
    pub log_exists: bool,
    pub records: Vec<ConversationRecord>,
}

/// Result structure for retraining.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub intents: usize,
    pub patterns: usize,
    pub vocabulary_size: usize,
    pub iterations: usize,
    pub converged: bool,
    pub final_loss: f64,
    pub training_time_ms: u64,
    pub cache_written: bool,
    pub evaluation: Option<Evaluation>,
}

/// One intent in the listing.
#[derive(Debug, Serialize)]
pub struct IntentSummary {
    pub tag: String,
    pub pattern_count: usize,
    pub response_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<String>>,
}

/// Result structure for listing intents.
#[derive(Debug, Serialize)]
pub struct IntentsListResult {
    pub corpus: String,
    pub intents: Vec<IntentSummary>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput: Serialize {
    fn print_human(&self) -> Result<()>;
}

impl HumanOutput for Exchange {
    fn print_human(&self) -> Result<()> {
        println!("{}", self.response);
        Ok(())
    }
}

impl HumanOutput for HistoryResult {
    fn print_human(&self) -> Result<()> {
        if !self.log_exists {
            println!("{NO_HISTORY_FOUND}");
            return Ok(());
        }
        if self.records.is_empty() {
            println!("{NO_HISTORY_AVAILABLE}");
            return Ok(());
        }

        for record in &self.records {
            println!("You: {}", record.user_input);
            println!("Bot: {}", record.bot_response);
            println!("Timestamp: {}", record.timestamp);
            println!("---");
        }
        Ok(())
    }
}

impl HumanOutput for TrainResult {
    fn print_human(&self) -> Result<()> {
        println!("Training Results:");
        println!("═════════════════");
        println!("Intents: {}", self.intents);
        println!("Patterns: {}", self.patterns);
        println!("Vocabulary size: {}", self.vocabulary_size);
        println!(
            "Iterations: {}{}",
            self.iterations,
            if self.converged { "" } else { " (did not converge)" }
        );
        println!("Final loss: {:.6}", self.final_loss);
        println!("Training time: {}ms", self.training_time_ms);
        println!(
            "Model cache: {}",
            if self.cache_written { "written" } else { "disabled" }
        );

        if let Some(evaluation) = &self.evaluation {
            println!();
            evaluation.print_human()?;
        }
        Ok(())
    }
}

impl HumanOutput for Evaluation {
    fn print_human(&self) -> Result<()> {
        println!("Evaluation:");
        println!("═══════════");
        println!(
            "Accuracy: {:.1}% ({}/{})",
            self.accuracy * 100.0,
            self.correct,
            self.total
        );

        if !self.misclassified.is_empty() {
            println!();
            println!("Misclassified patterns:");
            println!("───────────────────────");
            for miss in &self.misclassified {
                println!(
                    "  \"{}\": expected {}, predicted {}",
                    miss.pattern, miss.expected, miss.predicted
                );
            }
        }
        Ok(())
    }
}

impl HumanOutput for IntentsListResult {
    fn print_human(&self) -> Result<()> {
        println!("Intents in {}:", self.corpus);
        println!();

        let width = self
            .intents
            .iter()
            .map(|i| i.tag.chars().count())
            .max()
            .unwrap_or(0);

        for intent in &self.intents {
            println!(
                "{:<width$}  {} patterns, {} responses",
                intent.tag, intent.pattern_count, intent.response_count
            );
            if let Some(patterns) = &intent.patterns {
                println!("    patterns:  {}", patterns.join(" | "));
            }
            if let Some(responses) = &intent.responses {
                println!("    responses: {}", responses.join(" | "));
            }
        }
        Ok(())
    }
}

/// Output a result in the specified format.
pub fn output_result<T: HumanOutput>(message: &str, result: &T, args: &PalaverArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanOutput>(message: &str, result: &T, args: &PalaverArgs) -> Result<()> {
    if args.verbosity() > 1 && !message.is_empty() {
        println!("{message}");
        println!();
    }
    result.print_human()
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PalaverArgs) -> Result<()> {
    println!("{}", to_json(result, args.pretty)?);
    Ok(())
}

fn to_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    })
}
