//! Prompt-side performance benchmarks
//!
//! Measures performance of:
//! - Input validation and escaping
//! - Prompt composition
//! - Response post-processing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use reform_core::pipeline::{compose, postprocess};
use reform_core::validate::validate;

const SHORT_INPUT: &str = "Wand im Flur streichen, Risse vorher spachteln.";

fn long_input(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Room {} gets new laminate & skirting boards <oak>. ", i))
        .collect()
}

fn generated_reply(sections: usize) -> String {
    let mut reply = String::from("Here is the **Improved** Version.\n\n");
    for i in 0..sections {
        reply.push_str(&format!(
            "Original: item {i}\n\n  Improved: __Item {i}__ was renovated.  \n\n"
        ));
    }
    reply
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for sentences in [1, 10, 30] {
        let input = long_input(sentences);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sentences), &input, |b, input| {
            b.iter(|| validate(black_box(input), 2000))
        });
    }
    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let context = "Paint the walls with two coats. ".repeat(40);
    c.bench_function("compose/german", |b| {
        b.iter(|| compose(black_box("de"), black_box(&context), black_box(SHORT_INPUT)))
    });
    c.bench_function("compose/free_text_language", |b| {
        b.iter(|| compose(black_box("Deutsch bitte"), black_box(&context), black_box(SHORT_INPUT)))
    });
}

fn bench_postprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("postprocess");
    for sections in [1, 20, 100] {
        let reply = generated_reply(sections);
        group.throughput(Throughput::Bytes(reply.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &reply, |b, reply| {
            b.iter(|| postprocess(black_box(reply)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_validate, bench_compose, bench_postprocess);
criterion_main!(benches);
