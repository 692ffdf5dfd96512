//! Generation requests and their routing.
//!
//! A [`GenerationRequest`] names a category (`data`, `objects`, `events`), a sub-kind
//! (a distribution family or a shape kind) and a parameter map. Some parameter keys drive the
//! generator itself; every other key is an attribute whose value is resolved per shape.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

pub mod dispatch;
pub mod urn;

pub use dispatch::{GenerationContext, GenerationDispatcher, GenerationOutput, OutputData};
pub use urn::Urn;

/// Keys consumed by the generators rather than resolved as attributes.
pub const RESERVED_KEYS: [&str; 8] = [
    "fraction", "xdivs", "ydivs", "vertices", "std", "grid", "duration", "start",
];

/// Whether `key` is reserved: one of [`RESERVED_KEYS`] or a positional `p<digits>` key.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key) || positional_index(key).is_some()
}

fn positional_index(key: &str) -> Option<usize> {
    let digits = key.strip_prefix('p')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// What a request produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArtifactType {
    Number,
    Event,
    Object,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Data,
    Events,
    Objects,
}

impl Category {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "data" => Ok(Category::Data),
            "events" => Ok(Category::Events),
            "objects" => Ok(Category::Objects),
            other => Err(Error::UnsupportedCategory {
                category: other.to_owned(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Data => "data",
            Category::Events => "events",
            Category::Objects => "objects",
        }
    }

    pub fn artifact_type(self) -> ArtifactType {
        match self {
            Category::Data => ArtifactType::Number,
            Category::Events => ArtifactType::Event,
            Category::Objects => ArtifactType::Object,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request for generated data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationRequest {
    /// Raw category name; unknown categories are reported at dispatch.
    pub category: String,
    pub sub_kind: String,
    pub parameters: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(category: impl Into<String>, sub_kind: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sub_kind: sub_kind.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn parse(urn: &str) -> Result<Self> {
        Urn::parse(urn).map(Self::from)
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn category(&self) -> Result<Category> {
        Category::from_name(&self.category)
    }

    /// `[sub_kind, p0, p1, ...]`, stopping at the first missing positional key.
    pub fn distribution_tokens(&self) -> Vec<&str> {
        let mut tokens = vec![self.sub_kind.as_str()];
        tokens.extend(
            (0..)
                .map_while(|i| self.parameters.get(&format!("p{i}")))
                .map(String::as_str),
        );
        tokens
    }

    /// Non-reserved parameters, in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl From<Urn> for GenerationRequest {
    fn from(urn: Urn) -> Self {
        Self {
            category: urn.category,
            sub_kind: urn.sub_kind,
            parameters: urn.parameters,
        }
    }
}

impl fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", urn::ADAPTER, self.category, self.sub_kind)
    }
}
