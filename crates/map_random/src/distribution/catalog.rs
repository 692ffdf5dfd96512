//! Shared, memoizing catalog of distribution samplers.
//!
//! [`DistributionCatalog::resolve`] maps a token list (`family`, then textual parameters) to a
//! [`Sampler`]. Samplers are cached by [`Signature`], the exact token sequence as given, so
//! `["gaussian", "1", "2"]` and `["gaussian", "1.0", "2"]` are distinct entries. Entries are
//! never evicted. Failed resolutions cache nothing.
//!
//! The catalog is `Send + Sync`: lookups take a read lock, misses re-check under the write
//! lock before constructing, so one signature never yields two samplers. Each sampler owns its
//! generator behind its own mutex.
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::distribution::family::{self, Family};
use crate::distribution::model::{Distribution, Draw};
use crate::error::{Error, Result};

/// Canonical cache key: the full token sequence, unnormalized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature(Box<[String]>);

impl Signature {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Signature(tokens.iter().map(|t| t.as_ref().to_owned()).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            Some((name, params)) => write!(f, "{name}({})", params.join(", ")),
            None => f.write_str("()"),
        }
    }
}

/// A resolved distribution bound to its own pseudo-random generator.
pub struct Sampler {
    signature: Signature,
    distribution: Distribution,
    rng: Mutex<StdRng>,
}

impl Sampler {
    fn new(signature: Signature, distribution: Distribution, seed: u64) -> Self {
        Self {
            signature,
            distribution,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn family(&self) -> Family {
        self.distribution.family()
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Draw once, keeping the real/count distinction.
    pub fn draw(&self) -> Draw {
        let mut rng = self.rng.lock();
        self.distribution.sample(&mut *rng)
    }

    /// Draw once, widened to `f64`.
    pub fn sample(&self) -> f64 {
        self.draw().as_f64()
    }

    /// Draw `n` values under a single lock acquisition.
    pub fn sample_n(&self, n: usize) -> Vec<f64> {
        let mut rng = self.rng.lock();
        (0..n)
            .map(|_| self.distribution.sample(&mut *rng).as_f64())
            .collect()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("signature", &self.signature.to_string())
            .field("distribution", &self.distribution)
            .finish_non_exhaustive()
    }
}

/// Memoizing resolver from token lists to shared [`Sampler`]s.
pub struct DistributionCatalog {
    base_seed: u64,
    samplers: RwLock<HashMap<Signature, Arc<Sampler>>>,
}

impl DistributionCatalog {
    /// Creates an empty catalog whose samplers are seeded from the thread RNG.
    pub fn new() -> Self {
        Self::with_seed(rand::rng().next_u64())
    }

    /// Creates an empty catalog whose samplers are seeded deterministically from `base_seed`
    /// and their signature.
    pub fn with_seed(base_seed: u64) -> Self {
        Self {
            base_seed,
            samplers: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached samplers.
    pub fn len(&self) -> usize {
        self.samplers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samplers.read().is_empty()
    }

    /// Whether a sampler for exactly these tokens is cached.
    pub fn contains<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        self.samplers
            .read()
            .contains_key(&Signature::from_tokens(tokens))
    }

    /// Resolve `tokens` (family name, then textual parameters) to a shared sampler.
    ///
    /// Errors with [`Error::InvalidParameter`] when a parameter is not a finite number, when
    /// the family does not accept that many parameters, or when the values are out of range
    /// for the family; with [`Error::UnknownDistribution`] when the name is not a family.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Arc<Sampler>> {
        let signature = Signature::from_tokens(tokens);
        if let Some(sampler) = self.samplers.read().get(&signature) {
            return Ok(Arc::clone(sampler));
        }

        let mut samplers = self.samplers.write();
        if let Some(sampler) = samplers.get(&signature) {
            return Ok(Arc::clone(sampler));
        }

        let distribution = build_distribution(tokens)?;
        let seed = seed_for_signature(self.base_seed, &signature);
        debug!(signature = %signature, "constructed sampler");
        let sampler = Arc::new(Sampler::new(signature.clone(), distribution, seed));
        samplers.insert(signature, Arc::clone(&sampler));
        Ok(sampler)
    }

    /// Resolve `tokens` and draw once.
    pub fn sample<S: AsRef<str>>(&self, tokens: &[S]) -> Result<f64> {
        Ok(self.resolve(tokens)?.sample())
    }
}

impl Default for DistributionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DistributionCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistributionCatalog")
            .field("base_seed", &self.base_seed)
            .field("samplers", &self.len())
            .finish()
    }
}

fn build_distribution<S: AsRef<str>>(tokens: &[S]) -> Result<Distribution> {
    let Some((name, params)) = tokens.split_first() else {
        return Err(Error::UnknownDistribution {
            name: String::new(),
        });
    };
    let name = name.as_ref();

    let values = params
        .iter()
        .map(|token| {
            let token = token.as_ref();
            token
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    Error::invalid_parameter(name, format!("'{token}' is not a finite number"))
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    let family = Family::from_name(name).ok_or_else(|| Error::UnknownDistribution {
        name: name.to_owned(),
    })?;

    family::lookup(family, values.len())?.build(&values)
}

/// Derive a per-sampler seed from the catalog seed and the signature.
pub fn seed_for_signature(base_seed: u64, signature: &Signature) -> u64 {
    let mut hasher = DefaultHasher::new();
    signature.hash(&mut hasher);
    mix_u64(base_seed ^ hasher.finish().wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}
