use criterion::{criterion_group, criterion_main, Criterion};
use procdraft_core::tokenizer::analyze;
use procdraft_core::{rank_documents, Document};

fn sample_pages() -> Vec<String> {
    (0..200)
        .map(|i| format!("Procedure {i}: submit form {i} to operations. Wire cutoff is noon; ACAT transfers take {i} days. Margin calls require cash deposits."))
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let pages = sample_pages();
    c.bench_function("analyze_pages", |b| b.iter(|| pages.iter().map(|p| analyze(p).len()).sum::<usize>()));
}

fn bench_rank(c: &mut Criterion) {
    let docs: Vec<Document> = sample_pages().chunks(20).enumerate().map(|(i, pages)| Document::new(format!("doc{i}.pdf"), pages)).collect();
    c.bench_function("rank_corpus", |b| b.iter(|| rank_documents("margin call cash deposit deadline", &docs)));
}

criterion_group!(benches, bench_analyze, bench_rank);
criterion_main!(benches);
