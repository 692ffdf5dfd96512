//! Resource identifiers for generation requests.
//!
//! Grammar: `[klab:]random:<category>:<sub_kind>[#key=value&key=value...]`. A bare key in
//! the fragment maps to an empty value; when a key repeats, the last value wins.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const AUTHORITY: &str = "klab";
pub const ADAPTER: &str = "random";

/// A parsed resource identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Urn {
    pub category: String,
    pub sub_kind: String,
    pub parameters: BTreeMap<String, String>,
}

impl Urn {
    pub fn new(category: impl Into<String>, sub_kind: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            sub_kind: sub_kind.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidUrn {
            urn: text.to_owned(),
            reason: reason.to_owned(),
        };

        let (path, fragment) = match text.trim().split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (text.trim(), None),
        };

        let mut segments: Vec<&str> = path.split(':').collect();
        if segments.first() == Some(&AUTHORITY) {
            segments.remove(0);
        }
        let [adapter, category, sub_kind] = segments.as_slice() else {
            return Err(invalid(
                "expected [klab:]random:<category>:<sub_kind>",
            ));
        };
        if *adapter != ADAPTER {
            return Err(invalid("adapter must be 'random'"));
        }
        if category.is_empty() || sub_kind.is_empty() {
            return Err(invalid("category and sub-kind must not be empty"));
        }

        let mut urn = Urn::new(*category, *sub_kind);
        for pair in fragment.into_iter().flat_map(|f| f.split('&')) {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return Err(invalid("parameter with empty key"));
            }
            urn.parameters.insert(key.to_owned(), value.to_owned());
        }
        Ok(urn)
    }
}

impl FromStr for Urn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Urn::parse(s)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{AUTHORITY}:{ADAPTER}:{}:{}",
            self.category, self.sub_kind
        )?;
        for (i, (key, value)) in self.parameters.iter().enumerate() {
            f.write_str(if i == 0 { "#" } else { "&" })?;
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
