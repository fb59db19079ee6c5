//! Criterion benchmarks for alder-tree: growing, pruning, and the pruning path.

use criterion::{Criterion, criterion_group, criterion_main};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use alder_tree::DecisionTreeConfig;

/// Binary dataset where the first two features carry signal and 15% of
/// labels are flipped, so the unpruned tree grows deep.
fn make_noisy(n_samples: usize, n_features: usize, seed: u64) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut features = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);
    for _ in 0..n_samples {
        let row: Vec<f64> = (0..n_features).map(|_| rng.r#gen::<f64>()).collect();
        let mut label = usize::from(row[0] + row[1] > 1.0);
        if rng.r#gen::<f64>() < 0.15 {
            label = 1 - label;
        }
        features.push(row);
        labels.push(label);
    }
    (features, labels)
}

fn bench_fit_unpruned(c: &mut Criterion) {
    let (features, labels) = make_noisy(1000, 10, 42);
    let cfg = DecisionTreeConfig::new();

    c.bench_function("tree_fit_1000x10_unpruned", |b| {
        b.iter(|| cfg.fit(&features, &labels).unwrap());
    });
}

fn bench_fit_pruned(c: &mut Criterion) {
    let (features, labels) = make_noisy(1000, 10, 42);
    let cfg = DecisionTreeConfig::new().with_ccp_alpha(0.002);

    c.bench_function("tree_fit_1000x10_alpha_0.002", |b| {
        b.iter(|| cfg.fit(&features, &labels).unwrap());
    });
}

fn bench_pruning_path(c: &mut Criterion) {
    let (features, labels) = make_noisy(1000, 10, 42);
    let cfg = DecisionTreeConfig::new();

    c.bench_function("tree_pruning_path_1000x10", |b| {
        b.iter(|| cfg.pruning_path(&features, &labels).unwrap());
    });
}

criterion_group!(
    benches,
    bench_fit_unpruned,
    bench_fit_pruned,
    bench_pruning_path
);
criterion_main!(benches);
