//! Distribution families and the (family, arity) overload registry.
//!
//! Every family accepts a small fixed set of parameter counts. Instead of a nested switch,
//! each accepted combination is one [`Overload`] row in [`OVERLOADS`], pairing the family and
//! arity with the constructor that builds the concrete [`Distribution`]. Adding a family means
//! adding a variant and its rows; the resolution code does not change.
use std::fmt;

use crate::distribution::model::Distribution;
use crate::error::{Error, Result};

/// Enumerated set of distribution families addressable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Family {
    Uniform,
    LogNormal,
    Gaussian,
    Weibull,
    Triangular,
    Cauchy,
    Beta,
    StudentT,
    F,
    Exponential,
    Binomial,
    Hypergeometric,
    Pascal,
    Poisson,
    Gamma,
    Pareto,
    Geometric,
    Laplace,
    Logistic,
    Levy,
    Nakagami,
}

impl Family {
    pub const ALL: [Family; 21] = [
        Family::Uniform,
        Family::LogNormal,
        Family::Gaussian,
        Family::Weibull,
        Family::Triangular,
        Family::Cauchy,
        Family::Beta,
        Family::StudentT,
        Family::F,
        Family::Exponential,
        Family::Binomial,
        Family::Hypergeometric,
        Family::Pascal,
        Family::Poisson,
        Family::Gamma,
        Family::Pareto,
        Family::Geometric,
        Family::Laplace,
        Family::Logistic,
        Family::Levy,
        Family::Nakagami,
    ];

    /// Name used in resource identifiers and call expressions.
    pub fn name(self) -> &'static str {
        match self {
            Family::Uniform => "uniform",
            Family::LogNormal => "lognormal",
            Family::Gaussian => "gaussian",
            Family::Weibull => "weibull",
            Family::Triangular => "triangular",
            Family::Cauchy => "cauchy",
            Family::Beta => "beta",
            Family::StudentT => "t",
            Family::F => "f",
            Family::Exponential => "exponential",
            Family::Binomial => "binomial",
            Family::Hypergeometric => "hypergeometric",
            Family::Pascal => "pascal",
            Family::Poisson => "poisson",
            Family::Gamma => "gamma",
            Family::Pareto => "pareto",
            Family::Geometric => "geometric",
            Family::Laplace => "laplace",
            Family::Logistic => "logistic",
            Family::Levy => "levy",
            Family::Nakagami => "nakagami",
        }
    }

    /// Case-sensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Family> {
        Family::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Parameter counts accepted by this family, ascending.
    pub fn arities(self) -> Vec<usize> {
        OVERLOADS
            .iter()
            .filter(|o| o.family == self)
            .map(|o| o.arity)
            .collect()
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Build = fn(&[f64]) -> Result<Distribution>;

/// One accepted (family, arity) combination and its constructor.
pub struct Overload {
    pub family: Family,
    pub arity: usize,
    build: Build,
}

impl Overload {
    /// Construct the distribution. `params.len()` must equal `self.arity`.
    pub fn build(&self, params: &[f64]) -> Result<Distribution> {
        debug_assert_eq!(params.len(), self.arity);
        (self.build)(params)
    }
}

const fn overload(family: Family, arity: usize, build: Build) -> Overload {
    Overload {
        family,
        arity,
        build,
    }
}

/// Trailing inverse-CDF accuracy / convergence arguments are validated and otherwise ignored:
/// every sampler here draws exactly.
pub static OVERLOADS: &[Overload] = &[
    overload(Family::Uniform, 0, |_| Distribution::uniform(0.0, 1.0)),
    overload(Family::Uniform, 2, |p| Distribution::uniform(p[0], p[1])),
    overload(Family::LogNormal, 0, |_| Distribution::lognormal(0.0, 1.0)),
    overload(Family::LogNormal, 2, |p| Distribution::lognormal(p[0], p[1])),
    overload(Family::Gaussian, 0, |_| Distribution::gaussian(0.0, 1.0)),
    overload(Family::Gaussian, 2, |p| Distribution::gaussian(p[0], p[1])),
    overload(Family::Weibull, 2, |p| Distribution::weibull(p[0], p[1])),
    overload(Family::Weibull, 3, |p| {
        accuracy(Family::Weibull, p[2])?;
        Distribution::weibull(p[0], p[1])
    }),
    overload(Family::Triangular, 3, |p| {
        Distribution::triangular(p[0], p[1], p[2])
    }),
    overload(Family::Cauchy, 0, |_| Distribution::cauchy(0.0, 1.0)),
    overload(Family::Cauchy, 2, |p| Distribution::cauchy(p[0], p[1])),
    overload(Family::Cauchy, 3, |p| {
        accuracy(Family::Cauchy, p[2])?;
        Distribution::cauchy(p[0], p[1])
    }),
    overload(Family::Beta, 2, |p| Distribution::beta(p[0], p[1])),
    overload(Family::Beta, 3, |p| {
        accuracy(Family::Beta, p[2])?;
        Distribution::beta(p[0], p[1])
    }),
    overload(Family::StudentT, 1, |p| Distribution::student_t(p[0])),
    overload(Family::StudentT, 2, |p| {
        accuracy(Family::StudentT, p[1])?;
        Distribution::student_t(p[0])
    }),
    overload(Family::F, 2, |p| Distribution::fisher_f(p[0], p[1])),
    overload(Family::F, 3, |p| {
        accuracy(Family::F, p[2])?;
        Distribution::fisher_f(p[0], p[1])
    }),
    overload(Family::Exponential, 1, |p| Distribution::exponential(p[0])),
    overload(Family::Exponential, 2, |p| {
        accuracy(Family::Exponential, p[1])?;
        Distribution::exponential(p[0])
    }),
    overload(Family::Binomial, 2, |p| {
        Distribution::binomial(count(Family::Binomial, p[0])?, p[1])
    }),
    overload(Family::Hypergeometric, 3, |p| {
        Distribution::hypergeometric(
            count(Family::Hypergeometric, p[0])?,
            count(Family::Hypergeometric, p[1])?,
            count(Family::Hypergeometric, p[2])?,
        )
    }),
    overload(Family::Pascal, 2, |p| {
        Distribution::pascal(count(Family::Pascal, p[0])?, p[1])
    }),
    overload(Family::Poisson, 0, |_| Distribution::poisson(1.0)),
    overload(Family::Poisson, 1, |p| Distribution::poisson(p[0])),
    overload(Family::Poisson, 2, |p| {
        accuracy(Family::Poisson, p[1])?;
        Distribution::poisson(p[0])
    }),
    overload(Family::Gamma, 2, |p| Distribution::gamma(p[0], p[1])),
    overload(Family::Gamma, 3, |p| {
        accuracy(Family::Gamma, p[2])?;
        Distribution::gamma(p[0], p[1])
    }),
    overload(Family::Pareto, 0, |_| Distribution::pareto(1.0, 1.0)),
    overload(Family::Pareto, 2, |p| Distribution::pareto(p[0], p[1])),
    overload(Family::Pareto, 3, |p| {
        accuracy(Family::Pareto, p[2])?;
        Distribution::pareto(p[0], p[1])
    }),
    overload(Family::Geometric, 1, |p| Distribution::geometric(p[0])),
    overload(Family::Laplace, 2, |p| Distribution::laplace(p[0], p[1])),
    overload(Family::Logistic, 2, |p| Distribution::logistic(p[0], p[1])),
    overload(Family::Levy, 2, |p| Distribution::levy(p[0], p[1])),
    overload(Family::Nakagami, 2, |p| Distribution::nakagami(p[0], p[1])),
    overload(Family::Nakagami, 3, |p| {
        accuracy(Family::Nakagami, p[2])?;
        Distribution::nakagami(p[0], p[1])
    }),
];

/// Find the constructor for `family` called with `arity` parameters.
pub fn lookup(family: Family, arity: usize) -> Result<&'static Overload> {
    OVERLOADS
        .iter()
        .find(|o| o.family == family && o.arity == arity)
        .ok_or_else(|| {
            let accepted = family
                .arities()
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            Error::invalid_parameter(
                family.name(),
                format!("expected {accepted} parameters, got {arity}"),
            )
        })
}

/// Integer-valued parameter: finite, non-negative, truncated toward zero.
fn count(family: Family, value: f64) -> Result<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_parameter(
            family.name(),
            format!("expected a non-negative integer, got {value}"),
        ));
    }
    Ok(value.trunc() as u64)
}

fn accuracy(family: Family, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(
            family.name(),
            format!("accuracy must be > 0, got {value}"),
        ))
    }
}
