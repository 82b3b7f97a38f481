//! Criterion benchmarks for Palaver.
//!
//! Covers text analysis, classifier training and per-turn classification.

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use palaver::analysis::{Analyzer, StandardAnalyzer};
use palaver::config::{AnalysisConfig, TrainingConfig};
use palaver::corpus::{Intent, IntentCorpus};
use palaver::ml::{IntentClassifier, MLBasedIntentClassifier};
use std::hint::black_box;

/// Generate a synthetic corpus with disjoint vocabulary per intent.
fn generate_corpus(intents: usize, patterns_per_intent: usize) -> IntentCorpus {
    let words = [
        "weather", "order", "refund", "account", "password", "shipping", "invoice", "delivery",
        "balance", "booking", "support", "price",
    ];

    let intents = (0..intents)
        .map(|i| {
            let patterns: Vec<String> = (0..patterns_per_intent)
                .map(|p| {
                    format!(
                        "{} {} topic{i} variant{p}",
                        words[(i * 7 + p) % words.len()],
                        words[(i * 3 + p * 5) % words.len()]
                    )
                })
                .collect();
            Intent::new(format!("intent_{i}"), patterns, [format!("reply {i}")])
        })
        .collect();

    IntentCorpus::from_intents(intents).unwrap()
}

/// Benchmark text analysis.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    let analyzer = StandardAnalyzer::new();
    let text = "Hello there! Could you tell me what the weather's like in Lisbon tomorrow?";

    group.bench_function("standard_terms", |b| {
        b.iter(|| black_box(analyzer.terms(black_box(text)).unwrap()))
    });

    group.finish();
}

/// Benchmark classifier training.
fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for (intents, patterns) in [(5, 5), (20, 10)] {
        let corpus = generate_corpus(intents, patterns);
        group.throughput(Throughput::Elements(corpus.pattern_count() as u64));
        group.bench_function(format!("train_{intents}x{patterns}"), |b| {
            b.iter(|| {
                MLBasedIntentClassifier::train(
                    black_box(&corpus),
                    &AnalysisConfig::default(),
                    &TrainingConfig::default(),
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

/// Benchmark single-utterance classification.
fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let corpus = generate_corpus(20, 10);
    let classifier = MLBasedIntentClassifier::train(
        &corpus,
        &AnalysisConfig::default(),
        &TrainingConfig::default(),
    )
    .unwrap();

    group.bench_function("predict", |b| {
        b.iter(|| black_box(classifier.predict(black_box("refund my order topic3")).unwrap()))
    });

    group.bench_function("predict_with_confidence", |b| {
        b.iter(|| {
            black_box(
                classifier
                    .predict_with_confidence(black_box("password account help"))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_analysis, bench_training, bench_classification);
criterion_main!(benches);
