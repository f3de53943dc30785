use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use sort_test_tools::patterns;

fn bench_patterns(c: &mut Criterion, test_len: usize) {
    let pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("random", patterns::random),
        ("random_d20", |len| patterns::random_uniform(len, 0..20)),
        ("random_s95", |len| patterns::random_sorted(len, 95.0)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("all_equal", patterns::all_equal),
        ("sawtooth", |len| patterns::sawtooth(len, 32)),
        ("organ_pipe", patterns::organ_pipe),
        ("saw_mixed", |len| {
            patterns::saw_mixed(len, ((len as f64).log2().round()) as usize)
        }),
    ];

    for (pattern_name, pattern_provider) in pattern_providers {
        let batch_size = if test_len > 30 {
            BatchSize::LargeInput
        } else {
            BatchSize::SmallInput
        };

        c.bench_function(&format!("blipsort-i32-{pattern_name}-{test_len}"), |b| {
            b.iter_batched_ref(
                || pattern_provider(test_len),
                |test_data| blipsort::sort(black_box(test_data.as_mut_slice())),
                batch_size,
            )
        });
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    // Powers of ten to see the asymptotic trend, plus the insertion sort
    // boundary on both sides.
    for test_len in [87, 88, 1_000, 10_000, 100_000, 1_000_000] {
        bench_patterns(c, test_len);
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
