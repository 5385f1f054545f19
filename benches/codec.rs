use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lipsum::lipsum;

fn compression(c: &mut Criterion) {
    let input = lipsum(2048);
    let input = input.as_bytes();

    c.bench_function("huffman compression", |b| {
        b.iter(|| huffpack::compress(black_box(input)))
    });
}

fn decompression(c: &mut Criterion) {
    let input = lipsum(4096);
    let compressed = huffpack::compress(input.as_bytes()).unwrap();

    c.bench_function("huffman decompression", |b| {
        b.iter(|| huffpack::decompress(black_box(&compressed)))
    });
}

criterion_group!(benches, compression, decompression);
criterion_main!(benches);
