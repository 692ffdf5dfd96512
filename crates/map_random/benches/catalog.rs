mod common;

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use map_random::prelude::{AttributeValueResolver, DistributionCatalog};

const SIGNATURES: &[&[&str]] = &[
    &["uniform", "0", "1"],
    &["gaussian", "10", "2"],
    &["beta", "2", "5"],
    &["poisson", "4"],
    &["binomial", "20", "0.3"],
    &["pascal", "3", "0.4"],
    &["weibull", "1.5", "2"],
    &["nakagami", "2", "1"],
];

fn resolve_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog/resolve");

    group.throughput(common::draws_throughput(SIGNATURES.len()));
    group.bench_function("cached", |b| {
        let catalog = DistributionCatalog::with_seed(0xC0FFEE);
        for &tokens in SIGNATURES {
            catalog.resolve(tokens).ok();
        }
        b.iter(|| {
            for &tokens in SIGNATURES {
                black_box(catalog.resolve(tokens).ok());
            }
        });
    });

    group.bench_function("cold", |b| {
        b.iter(|| {
            let catalog = DistributionCatalog::with_seed(0xBADC0DE);
            for &tokens in SIGNATURES {
                black_box(catalog.resolve(tokens).ok());
            }
        });
    });

    group.finish();
}

fn sample_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog/sample_n");
    let catalog = DistributionCatalog::with_seed(0xDEADBEEF);

    for &tokens in SIGNATURES {
        let Ok(sampler) = catalog.resolve(tokens) else {
            continue;
        };
        let n = 1024usize;
        group.throughput(common::draws_throughput(n));
        group.bench_with_input(BenchmarkId::new(tokens[0], n), &n, |b, &n| {
            b.iter(|| black_box(sampler.sample_n(n)));
        });
    }

    group.finish();
}

fn attribute_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("attribute/resolve");
    let resolver = AttributeValueResolver::new(Arc::new(DistributionCatalog::with_seed(7)));

    for raw in ["42.5", "gaussian(10, 2)", "forest"] {
        group.bench_with_input(BenchmarkId::from_parameter(raw), &raw, |b, raw| {
            b.iter(|| black_box(resolver.resolve(raw).ok()));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = resolve_benches, sample_benches, attribute_benches
}
criterion_main!(benches);
