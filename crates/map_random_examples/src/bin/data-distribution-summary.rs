use map_random::prelude::*;
use map_random_examples::init_tracing;

const DRAWS: usize = 20_000;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = DistributionCatalog::with_seed(42);
    let expressions: &[&[&str]] = &[
        &["uniform", "0", "10"],
        &["gaussian", "10", "2"],
        &["lognormal", "0", "0.5"],
        &["exponential", "3"],
        &["triangular", "0", "2", "10"],
        &["beta", "2", "5"],
        &["weibull", "1.5", "2"],
        &["poisson", "4"],
        &["binomial", "20", "0.3"],
        &["pascal", "3", "0.4"],
        &["gamma", "2", "2"],
        &["laplace", "0", "1"],
    ];

    println!(
        "{:<28} {:>10} {:>10} {:>10} {:>10}",
        "distribution", "mean", "std", "min", "max"
    );
    for &tokens in expressions {
        let sampler = catalog.resolve(tokens)?;
        let draws = sampler.sample_n(DRAWS);
        let (mean, std, min, max) = summary(&draws);
        println!(
            "{:<28} {mean:>10.3} {std:>10.3} {min:>10.3} {max:>10.3}",
            sampler.signature().to_string()
        );
    }

    // Expressions go through the same catalog as attribute values.
    let resolver = AttributeValueResolver::new(std::sync::Arc::new(catalog));
    for raw in ["12.5", "gaussian(100, 15)", "forest"] {
        println!("{raw:<28} -> {:?}", resolver.resolve(raw)?);
    }

    Ok(())
}

fn summary(values: &[f64]) -> (f64, f64, f64, f64) {
    let n = values.len().max(1) as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    (mean, var.sqrt(), min, max)
}
