//! Criterion benchmarks for alder-search: threshold sweep and feature extraction.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use alder_search::SearchConfig;

fn make_noisy(
    n_samples: usize,
    n_features: usize,
    seed: u64,
) -> (Vec<Vec<f64>>, Vec<usize>, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>()).collect();
        let mut label = usize::from(row[0] > 0.5);
        if rng.r#gen::<f64>() < 0.1 {
            label = 1 - label;
        }
        features.push(row);
        labels.push(label);
    }
    let names: Vec<String> = (0..n_features).map(|f| format!("f{f}")).collect();
    (features, labels, names)
}

fn bench_threshold_search(c: &mut Criterion) {
    let (x_train, y_train, _) = make_noisy(300, 5, 42);
    let (x_test, y_test, _) = make_noisy(100, 5, 43);
    let cfg = SearchConfig::new();

    c.bench_function("optimal_ccp_alpha_300x5", |b| {
        b.iter(|| {
            cfg.optimal_ccp_alpha(&x_train, &y_train, &x_test, &y_test)
                .unwrap()
        });
    });
}

fn bench_threshold_search_sequential(c: &mut Criterion) {
    let (x_train, y_train, _) = make_noisy(300, 5, 42);
    let (x_test, y_test, _) = make_noisy(100, 5, 43);
    let cfg = SearchConfig::new().with_batch_size(1);

    c.bench_function("optimal_ccp_alpha_300x5_sequential", |b| {
        b.iter(|| {
            cfg.optimal_ccp_alpha(&x_train, &y_train, &x_test, &y_test)
                .unwrap()
        });
    });
}

fn bench_important_feature(c: &mut Criterion) {
    let (x_train, y_train, names) = make_noisy(300, 5, 42);
    let cfg = SearchConfig::new();

    c.bench_function("important_feature_300x5", |b| {
        b.iter(|| cfg.important_feature(&x_train, &y_train, &names).unwrap());
    });
}

criterion_group!(
    benches,
    bench_threshold_search,
    bench_threshold_search_sequential,
    bench_important_feature
);
criterion_main!(benches);
