//! Concrete distributions behind a resolved family.
//!
//! Most variants wrap a `rand_distr` type. Laplace, logistic and Lévy draws are computed by
//! inversion from open-interval uniforms; Pascal is a gamma-mixed Poisson draw and Nakagami the
//! square root of a gamma draw.
use rand::distr::Uniform;
use rand::RngCore;
use rand_distr::Distribution as _;
use rand_distr::{
    Beta, Binomial, Cauchy, Exp, FisherF, Gamma, Geometric, Hypergeometric, LogNormal, Normal,
    Pareto, Poisson, StandardNormal, StudentT, Triangular, Weibull,
};

use crate::distribution::family::Family;
use crate::distribution::rand_open01;
use crate::error::{Error, Result};

/// A single draw, either real-valued or a count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Draw {
    Real(f64),
    Count(u64),
}

impl Draw {
    /// Widen to `f64`.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Draw::Real(v) => v,
            Draw::Count(n) => n as f64,
        }
    }
}

/// Concrete distribution with validated parameters.
#[derive(Clone, Debug)]
pub enum Distribution {
    Uniform(Uniform<f64>),
    LogNormal(LogNormal<f64>),
    Gaussian(Normal<f64>),
    Weibull(Weibull<f64>),
    Triangular(Triangular<f64>),
    Cauchy(Cauchy<f64>),
    Beta(Beta<f64>),
    StudentT(StudentT<f64>),
    F(FisherF<f64>),
    Exponential(Exp<f64>),
    Binomial(Binomial),
    Hypergeometric(Hypergeometric),
    Pascal(Pascal),
    Poisson(Poisson<f64>),
    Gamma(Gamma<f64>),
    Pareto(Pareto<f64>),
    Geometric(Geometric),
    Laplace { location: f64, scale: f64 },
    Logistic { location: f64, scale: f64 },
    Levy { location: f64, scale: f64 },
    Nakagami(Gamma<f64>),
}

/// Negative binomial over failures, drawn as `Poisson(Gamma(r, (1 - p) / p))` so the cost of
/// a draw does not grow with the success count. `None` when no failure can occur.
#[derive(Clone, Debug)]
pub struct Pascal {
    mixing: Option<Gamma<f64>>,
}

impl Pascal {
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> u64 {
        let Some(mixing) = &self.mixing else {
            return 0;
        };
        let lambda: f64 = mixing.sample(rng);
        if lambda.is_nan() || lambda <= 0.0 {
            return 0;
        }
        match Poisson::new(lambda) {
            Ok(poisson) => {
                let n: f64 = poisson.sample(rng);
                n as u64
            }
            // Beyond the Poisson sampler's range the mean is a close enough draw.
            Err(_) => lambda.round() as u64,
        }
    }
}

fn invalid(family: Family, reason: impl ToString) -> Error {
    Error::invalid_parameter(family.name(), reason)
}

fn positive(family: Family, what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(family, format!("{what} must be > 0, got {value}")))
    }
}

fn finite(family: Family, what: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(family, format!("{what} must be finite, got {value}")))
    }
}

fn probability(family: Family, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(invalid(
            family,
            format!("probability must be in [0, 1], got {value}"),
        ))
    }
}

impl Distribution {
    /// Uniform on `[lower, upper)`.
    pub fn uniform(lower: f64, upper: f64) -> Result<Self> {
        finite(Family::Uniform, "lower", lower)?;
        finite(Family::Uniform, "upper", upper)?;
        Uniform::new(lower, upper)
            .map(Distribution::Uniform)
            .map_err(|e| invalid(Family::Uniform, e))
    }

    /// Log-normal with log-space mean `scale` and log-space deviation `shape`.
    pub fn lognormal(scale: f64, shape: f64) -> Result<Self> {
        finite(Family::LogNormal, "scale", scale)?;
        positive(Family::LogNormal, "shape", shape)?;
        LogNormal::new(scale, shape)
            .map(Distribution::LogNormal)
            .map_err(|e| invalid(Family::LogNormal, e))
    }

    pub fn gaussian(mean: f64, std_dev: f64) -> Result<Self> {
        finite(Family::Gaussian, "mean", mean)?;
        positive(Family::Gaussian, "standard deviation", std_dev)?;
        Normal::new(mean, std_dev)
            .map(Distribution::Gaussian)
            .map_err(|e| invalid(Family::Gaussian, e))
    }

    pub fn weibull(shape: f64, scale: f64) -> Result<Self> {
        positive(Family::Weibull, "shape", shape)?;
        positive(Family::Weibull, "scale", scale)?;
        Weibull::new(scale, shape)
            .map(Distribution::Weibull)
            .map_err(|e| invalid(Family::Weibull, e))
    }

    /// Triangular on `[lower, upper]` peaking at `mode`.
    pub fn triangular(lower: f64, mode: f64, upper: f64) -> Result<Self> {
        finite(Family::Triangular, "lower", lower)?;
        finite(Family::Triangular, "mode", mode)?;
        finite(Family::Triangular, "upper", upper)?;
        if !(lower <= mode && mode <= upper && lower < upper) {
            return Err(invalid(
                Family::Triangular,
                format!("expected lower <= mode <= upper with lower < upper, got {lower}, {mode}, {upper}"),
            ));
        }
        Triangular::new(lower, upper, mode)
            .map(Distribution::Triangular)
            .map_err(|e| invalid(Family::Triangular, e))
    }

    pub fn cauchy(median: f64, scale: f64) -> Result<Self> {
        finite(Family::Cauchy, "median", median)?;
        positive(Family::Cauchy, "scale", scale)?;
        Cauchy::new(median, scale)
            .map(Distribution::Cauchy)
            .map_err(|e| invalid(Family::Cauchy, e))
    }

    pub fn beta(alpha: f64, beta: f64) -> Result<Self> {
        positive(Family::Beta, "alpha", alpha)?;
        positive(Family::Beta, "beta", beta)?;
        Beta::new(alpha, beta)
            .map(Distribution::Beta)
            .map_err(|e| invalid(Family::Beta, e))
    }

    pub fn student_t(degrees_of_freedom: f64) -> Result<Self> {
        positive(Family::StudentT, "degrees of freedom", degrees_of_freedom)?;
        StudentT::new(degrees_of_freedom)
            .map(Distribution::StudentT)
            .map_err(|e| invalid(Family::StudentT, e))
    }

    pub fn fisher_f(numerator_df: f64, denominator_df: f64) -> Result<Self> {
        positive(Family::F, "numerator degrees of freedom", numerator_df)?;
        positive(Family::F, "denominator degrees of freedom", denominator_df)?;
        FisherF::new(numerator_df, denominator_df)
            .map(Distribution::F)
            .map_err(|e| invalid(Family::F, e))
    }

    /// Exponential parameterised by its mean (not its rate).
    pub fn exponential(mean: f64) -> Result<Self> {
        positive(Family::Exponential, "mean", mean)?;
        Exp::new(1.0 / mean)
            .map(Distribution::Exponential)
            .map_err(|e| invalid(Family::Exponential, e))
    }

    pub fn binomial(trials: u64, p: f64) -> Result<Self> {
        probability(Family::Binomial, p)?;
        Binomial::new(trials, p)
            .map(Distribution::Binomial)
            .map_err(|e| invalid(Family::Binomial, e))
    }

    pub fn hypergeometric(population: u64, successes: u64, sample_size: u64) -> Result<Self> {
        if successes > population || sample_size > population {
            return Err(invalid(
                Family::Hypergeometric,
                format!(
                    "successes ({successes}) and sample size ({sample_size}) must not exceed population ({population})"
                ),
            ));
        }
        Hypergeometric::new(population, successes, sample_size)
            .map(Distribution::Hypergeometric)
            .map_err(|e| invalid(Family::Hypergeometric, e))
    }

    /// Number of failures before the `successes`-th success.
    pub fn pascal(successes: u64, p: f64) -> Result<Self> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(invalid(
                Family::Pascal,
                format!("probability must be in (0, 1], got {p}"),
            ));
        }
        if successes == 0 || p == 1.0 {
            return Ok(Distribution::Pascal(Pascal { mixing: None }));
        }
        Gamma::new(successes as f64, (1.0 - p) / p)
            .map(|g| Distribution::Pascal(Pascal { mixing: Some(g) }))
            .map_err(|e| invalid(Family::Pascal, e))
    }

    pub fn poisson(mean: f64) -> Result<Self> {
        positive(Family::Poisson, "mean", mean)?;
        Poisson::new(mean)
            .map(Distribution::Poisson)
            .map_err(|e| invalid(Family::Poisson, e))
    }

    pub fn gamma(shape: f64, scale: f64) -> Result<Self> {
        positive(Family::Gamma, "shape", shape)?;
        positive(Family::Gamma, "scale", scale)?;
        Gamma::new(shape, scale)
            .map(Distribution::Gamma)
            .map_err(|e| invalid(Family::Gamma, e))
    }

    pub fn pareto(scale: f64, shape: f64) -> Result<Self> {
        positive(Family::Pareto, "scale", scale)?;
        positive(Family::Pareto, "shape", shape)?;
        Pareto::new(scale, shape)
            .map(Distribution::Pareto)
            .map_err(|e| invalid(Family::Pareto, e))
    }

    /// Number of failures before the first success.
    pub fn geometric(p: f64) -> Result<Self> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(invalid(
                Family::Geometric,
                format!("probability must be in (0, 1], got {p}"),
            ));
        }
        Geometric::new(p)
            .map(Distribution::Geometric)
            .map_err(|e| invalid(Family::Geometric, e))
    }

    pub fn laplace(location: f64, scale: f64) -> Result<Self> {
        finite(Family::Laplace, "location", location)?;
        positive(Family::Laplace, "scale", scale)?;
        Ok(Distribution::Laplace { location, scale })
    }

    pub fn logistic(location: f64, scale: f64) -> Result<Self> {
        finite(Family::Logistic, "location", location)?;
        positive(Family::Logistic, "scale", scale)?;
        Ok(Distribution::Logistic { location, scale })
    }

    pub fn levy(location: f64, scale: f64) -> Result<Self> {
        finite(Family::Levy, "location", location)?;
        positive(Family::Levy, "scale", scale)?;
        Ok(Distribution::Levy { location, scale })
    }

    /// Nakagami with shape `m >= 0.5` and spread `omega > 0`.
    pub fn nakagami(shape: f64, spread: f64) -> Result<Self> {
        if !(shape.is_finite() && shape >= 0.5) {
            return Err(invalid(
                Family::Nakagami,
                format!("shape must be >= 0.5, got {shape}"),
            ));
        }
        positive(Family::Nakagami, "spread", spread)?;
        Gamma::new(shape, spread / shape)
            .map(Distribution::Nakagami)
            .map_err(|e| invalid(Family::Nakagami, e))
    }

    /// Family this distribution belongs to.
    pub fn family(&self) -> Family {
        match self {
            Distribution::Uniform(_) => Family::Uniform,
            Distribution::LogNormal(_) => Family::LogNormal,
            Distribution::Gaussian(_) => Family::Gaussian,
            Distribution::Weibull(_) => Family::Weibull,
            Distribution::Triangular(_) => Family::Triangular,
            Distribution::Cauchy(_) => Family::Cauchy,
            Distribution::Beta(_) => Family::Beta,
            Distribution::StudentT(_) => Family::StudentT,
            Distribution::F(_) => Family::F,
            Distribution::Exponential(_) => Family::Exponential,
            Distribution::Binomial(_) => Family::Binomial,
            Distribution::Hypergeometric(_) => Family::Hypergeometric,
            Distribution::Pascal(_) => Family::Pascal,
            Distribution::Poisson(_) => Family::Poisson,
            Distribution::Gamma(_) => Family::Gamma,
            Distribution::Pareto(_) => Family::Pareto,
            Distribution::Geometric(_) => Family::Geometric,
            Distribution::Laplace { .. } => Family::Laplace,
            Distribution::Logistic { .. } => Family::Logistic,
            Distribution::Levy { .. } => Family::Levy,
            Distribution::Nakagami(_) => Family::Nakagami,
        }
    }

    /// Draw one value using `rng`.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> Draw {
        match self {
            Distribution::Uniform(d) => Draw::Real(d.sample(rng)),
            Distribution::LogNormal(d) => Draw::Real(d.sample(rng)),
            Distribution::Gaussian(d) => Draw::Real(d.sample(rng)),
            Distribution::Weibull(d) => Draw::Real(d.sample(rng)),
            Distribution::Triangular(d) => Draw::Real(d.sample(rng)),
            Distribution::Cauchy(d) => Draw::Real(d.sample(rng)),
            Distribution::Beta(d) => Draw::Real(d.sample(rng)),
            Distribution::StudentT(d) => Draw::Real(d.sample(rng)),
            Distribution::F(d) => Draw::Real(d.sample(rng)),
            Distribution::Exponential(d) => Draw::Real(d.sample(rng)),
            Distribution::Binomial(d) => Draw::Count(d.sample(rng)),
            Distribution::Hypergeometric(d) => Draw::Count(d.sample(rng)),
            Distribution::Pascal(d) => Draw::Count(d.sample(rng)),
            Distribution::Poisson(d) => {
                let n: f64 = d.sample(rng);
                Draw::Count(n as u64)
            }
            Distribution::Gamma(d) => Draw::Real(d.sample(rng)),
            Distribution::Pareto(d) => Draw::Real(d.sample(rng)),
            Distribution::Geometric(d) => Draw::Count(d.sample(rng)),
            Distribution::Laplace { location, scale } => {
                let u = rand_open01(rng) - 0.5;
                Draw::Real(location - scale * u.signum() * (1.0 - 2.0 * u.abs()).ln())
            }
            Distribution::Logistic { location, scale } => {
                let u = rand_open01(rng);
                Draw::Real(location + scale * (u / (1.0 - u)).ln())
            }
            Distribution::Levy { location, scale } => {
                let z = loop {
                    let z: f64 = StandardNormal.sample(rng);
                    if z != 0.0 {
                        break z;
                    }
                };
                Draw::Real(location + scale / (z * z))
            }
            Distribution::Nakagami(g) => {
                let v: f64 = g.sample(rng);
                Draw::Real(v.sqrt())
            }
        }
    }
}
