//! Command implementations for the Palaver CLI.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use crate::cache::ModelCache;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PalaverConfig;
use crate::conversation::ConversationLog;
use crate::corpus::IntentCorpus;
use crate::engine::ChatEngine;
use crate::error::Result;
use crate::ml::classifier::MLBasedIntentClassifier;
use crate::ml::evaluation::evaluate;

/// Execute a CLI command.
pub fn execute_command(args: PalaverArgs) -> Result<()> {
    let config = args.load_config()?;

    match &args.command {
        Command::Chat(chat_args) => run_chat(chat_args, &config, &args),
        Command::Ask(ask_args) => ask(ask_args, &config, &args),
        Command::History(history_args) => show_history(history_args, &config, &args),
        Command::Train(train_args) => train(train_args, &config, &args),
        Command::Evaluate(evaluate_args) => run_evaluation(evaluate_args, &config, &args),
        Command::Intents(intents_args) => list_intents(intents_args, &config, &args),
    }
}

/// Interactive loop over stdin lines until end of input.
fn run_chat(args: &ChatArgs, config: &PalaverConfig, cli_args: &PalaverArgs) -> Result<()> {
    let engine = ChatEngine::from_config(config)?;
    let human = cli_args.output_format == OutputFormat::Human;

    if human && cli_args.verbosity() > 0 {
        println!(
            "Loaded {} intents. Type a message, or press Ctrl-D to leave.",
            engine.corpus().len()
        );
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut request_id: u64 = 0;

    loop {
        if human {
            print!("{}", args.prompt);
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            if human {
                println!();
            }
            break;
        }

        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim().is_empty() {
            continue;
        }

        request_id += 1;
        match engine.exchange(request_id, text) {
            Ok(exchange) if human => {
                if args.show_tag {
                    println!("Bot: {} [{}]", exchange.response, exchange.tag);
                } else {
                    println!("Bot: {}", exchange.response);
                }
            }
            Ok(exchange) => output_result("", &exchange, cli_args)?,
            // A failed turn never ends the session.
            Err(e) => log::error!("[request {request_id}] {e}"),
        }
    }

    Ok(())
}

/// Answer a single message.
fn ask(args: &AskArgs, config: &PalaverConfig, cli_args: &PalaverArgs) -> Result<()> {
    let engine = ChatEngine::from_config(config)?;
    let exchange = engine.exchange(1, &args.message())?;
    output_result(
        &format!("Predicted intent: {}", exchange.tag),
        &exchange,
        cli_args,
    )
}

/// Print the logged conversation.
fn show_history(args: &HistoryArgs, config: &PalaverConfig, cli_args: &PalaverArgs) -> Result<()> {
    let log = ConversationLog::new(&config.paths.chat_log);
    let log_exists = log.path().exists();
    let mut records = log.read_all()?;

    if let Some(limit) = args.limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    output_result(
        &format!("Chat history from {}", log.path().display()),
        &HistoryResult {
            log_exists,
            records,
        },
        cli_args,
    )
}

/// Retrain from the corpus and overwrite the cache.
fn train(args: &TrainArgs, config: &PalaverConfig, cli_args: &PalaverArgs) -> Result<()> {
    config.validate()?;
    let corpus = IntentCorpus::load(&config.paths.corpus)?;
    let classifier = MLBasedIntentClassifier::train(&corpus, &config.analysis, &config.training)?;

    let cache_written = if config.cache.enabled {
        let cache = ModelCache::from_config(&config.paths, &config.cache);
        cache
            .save(&corpus, classifier.feature_space()?, classifier.model())
            .with_context(|| {
                format!(
                    "writing model cache to {} and {}",
                    cache.vectorizer_path().display(),
                    cache.model_path().display()
                )
            })?;
        true
    } else {
        false
    };

    let evaluation = if args.evaluate {
        Some(evaluate(&classifier, &corpus)?)
    } else {
        None
    };

    let stats = classifier.model().stats();
    output_result(
        "Classifier trained",
        &TrainResult {
            intents: corpus.len(),
            patterns: corpus.pattern_count(),
            vocabulary_size: classifier.vectorizer().vocabulary_size(),
            iterations: stats.iterations,
            converged: stats.converged,
            final_loss: stats.final_loss,
            training_time_ms: stats.training_time_ms,
            cache_written,
            evaluation,
        },
        cli_args,
    )
}

/// Report training-set accuracy.
fn run_evaluation(
    args: &EvaluateArgs,
    config: &PalaverConfig,
    cli_args: &PalaverArgs,
) -> Result<()> {
    let engine = ChatEngine::from_config(config)?;
    let evaluation = engine.evaluate()?;
    output_result("Evaluation complete", &evaluation, cli_args)?;

    if let Some(min_accuracy) = args.min_accuracy
        && evaluation.accuracy < min_accuracy
    {
        return Err(anyhow::anyhow!(
            "accuracy {:.3} is below the required {min_accuracy:.3}",
            evaluation.accuracy
        )
        .into());
    }
    Ok(())
}

/// List the corpus intents.
fn list_intents(args: &IntentsArgs, config: &PalaverConfig, cli_args: &PalaverArgs) -> Result<()> {
    let corpus = IntentCorpus::load(&config.paths.corpus)?;

    let intents = corpus
        .intents()
        .iter()
        .map(|intent| IntentSummary {
            tag: intent.tag.clone(),
            pattern_count: intent.patterns.len(),
            response_count: intent.responses.len(),
            patterns: args.long.then(|| intent.patterns.clone()),
            responses: args.long.then(|| intent.responses.clone()),
        })
        .collect();

    output_result(
        "Intents",
        &IntentsListResult {
            corpus: config.paths.corpus.display().to_string(),
            intents,
        },
        cli_args,
    )
}
