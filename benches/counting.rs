use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wordfreq::{
    ArenaTable, Djb2Mix, Error, Fnv1, FrequencyTable, FxWord, InlineTable, StdTable, Tokenizer,
    WordCounter, WordSink,
};

/// Prose-like text with a small vocabulary
fn generate_prose(size: usize) -> Vec<u8> {
    let pattern = "It was the best of times, it was the worst of times; it was the age of \
                   wisdom, it was the age of Foolishness. ";
    pattern.repeat(size / pattern.len() + 1).into_bytes()[..size].to_vec()
}

/// Mostly distinct words, which keeps the tables growing
fn generate_distinct(size: usize) -> Vec<u8> {
    let mut result = Vec::with_capacity(size + 16);
    let mut seed = 12345u64;
    while result.len() < size {
        // Simple LCG random
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let len = 3 + (seed >> 60) as usize;
        for i in 0..len {
            result.push(b'a' + ((seed >> ((i * 3) % 60)) % 26) as u8);
        }
        result.push(b' ');
    }
    result.truncate(size);
    result
}

fn count<T: FrequencyTable + WordSink<Error = Error>>(
    table: T,
    data: &[u8],
    chunk_size: usize,
) -> usize {
    let mut counter = WordCounter::with_table(table, Tokenizer::new());
    let mut buffer = data.to_vec();
    for chunk in buffer.chunks_mut(chunk_size) {
        counter.feed_chunk(chunk).unwrap();
    }
    counter.finish().unwrap();
    counter.table().len()
}

fn bench_tables(c: &mut Criterion) {
    let sizes = [10_000, 100_000, 1_000_000];
    let mut group = c.benchmark_group("tables");

    for size in sizes.iter() {
        let data = generate_distinct(*size);
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::new("arena_fnv1", size), &data, |b, data| {
            b.iter(|| black_box(count(ArenaTable::<Fnv1>::new(), black_box(data), 65536)))
        });
        group.bench_with_input(BenchmarkId::new("inline_fnv1", size), &data, |b, data| {
            b.iter(|| black_box(count(InlineTable::<Fnv1>::new(), black_box(data), 65536)))
        });
        group.bench_with_input(BenchmarkId::new("arena_djb2_mix", size), &data, |b, data| {
            b.iter(|| black_box(count(ArenaTable::<Djb2Mix>::new(), black_box(data), 65536)))
        });
        group.bench_with_input(BenchmarkId::new("arena_fx", size), &data, |b, data| {
            b.iter(|| black_box(count(ArenaTable::<FxWord>::new(), black_box(data), 65536)))
        });
        group.bench_with_input(BenchmarkId::new("std_fnv1", size), &data, |b, data| {
            b.iter(|| black_box(count(StdTable::<Fnv1>::new(), black_box(data), 65536)))
        });
        group.bench_with_input(BenchmarkId::new("std_fx", size), &data, |b, data| {
            b.iter(|| black_box(count(StdTable::<FxWord>::new(), black_box(data), 65536)))
        });
    }

    group.finish();
}

fn bench_chunk_sizes(c: &mut Criterion) {
    let data = generate_prose(1_000_000);
    let mut group = c.benchmark_group("chunk_size");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for chunk_size in [16, 4096, 65536].iter() {
        group.bench_with_input(
            BenchmarkId::new("arena_fnv1", chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| black_box(count(ArenaTable::<Fnv1>::new(), black_box(&data), chunk_size)))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("std_fnv1", chunk_size),
            chunk_size,
            |b, &chunk_size| {
                b.iter(|| black_box(count(StdTable::<Fnv1>::new(), black_box(&data), chunk_size)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_tables, bench_chunk_sizes);
criterion_main!(benches);
