//! Resolution of caller-declared attribute values.
//!
//! A raw attribute value is either a numeric literal (`"3.14"`, `"42"`) or a distribution
//! call expression (`"gaussian(10, 2)"`). Literals resolve to themselves, expressions to one
//! fresh draw from the shared [`DistributionCatalog`]; anything else resolves to `None` and is
//! left to the caller.
use std::sync::Arc;

use crate::distribution::{DistributionCatalog, Family};
use crate::error::Result;

/// Resolves attribute text to numbers, sampling distribution expressions.
#[derive(Clone, Debug)]
pub struct AttributeValueResolver {
    catalog: Arc<DistributionCatalog>,
}

impl AttributeValueResolver {
    pub fn new(catalog: Arc<DistributionCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<DistributionCatalog> {
        &self.catalog
    }

    /// Resolve `raw` to a number.
    ///
    /// Returns `Ok(None)` when the text is neither a literal nor a call to a known
    /// distribution family. A call to a known family with unusable arguments is an error.
    pub fn resolve(&self, raw: &str) -> Result<Option<f64>> {
        if let Some(value) = parse_number(raw) {
            return Ok(Some(value));
        }

        match parse_function_call(raw) {
            Some(tokens) if Family::from_name(tokens[0]).is_some() => {
                Ok(Some(self.catalog.resolve(&tokens)?.sample()))
            }
            _ => Ok(None),
        }
    }
}

/// Parse a finite decimal or integer literal.
pub fn parse_number(raw: &str) -> Option<f64> {
    let text = raw.trim();
    let looks_numeric = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !looks_numeric {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split `name(arg, arg, ...)` into `[name, arg, arg, ...]`, trimming whitespace.
///
/// The name must be an identifier (ASCII letter or `_`, then letters, digits or `_`).
/// `name()` yields just `[name]`. Returns `None` for anything else.
pub fn parse_function_call(raw: &str) -> Option<Vec<&str>> {
    let text = raw.trim();
    let open = text.find('(')?;
    let inner = text.strip_suffix(')')?.get(open + 1..)?;

    let name = text[..open].trim_end();
    let mut chars = name.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return None;
    }
    if inner.contains(['(', ')']) {
        return None;
    }

    let mut tokens = vec![name];
    if !inner.trim().is_empty() {
        tokens.extend(inner.split(',').map(str::trim));
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn resolver() -> AttributeValueResolver {
        AttributeValueResolver::new(Arc::new(DistributionCatalog::with_seed(17)))
    }

    #[test]
    fn literals_resolve_to_themselves() {
        let r = resolver();
        assert_eq!(r.resolve("3.14").unwrap(), Some(3.14));
        assert_eq!(r.resolve("42").unwrap(), Some(42.0));
        assert_eq!(r.resolve(" -7.5e2 ").unwrap(), Some(-750.0));
        assert!(r.catalog().is_empty());
    }

    #[test]
    fn distribution_calls_are_sampled() {
        let r = resolver();
        let v = r.resolve("gaussian(0,1)").unwrap().expect("a draw");
        assert!(v.is_finite());
        let u = r.resolve("uniform( 2 , 8 )").unwrap().expect("a draw");
        assert!((2.0..8.0).contains(&u));
        assert!(r.resolve("poisson()").unwrap().is_some());
        assert_eq!(r.catalog().len(), 3);
    }

    #[test]
    fn repeated_calls_reuse_the_cached_sampler() {
        let r = resolver();
        let a = r.resolve("exponential(2)").unwrap().unwrap();
        let b = r.resolve("exponential(2)").unwrap().unwrap();
        assert!(a >= 0.0 && b >= 0.0);
        assert_eq!(r.catalog().len(), 1);
    }

    #[test]
    fn other_text_resolves_to_nothing() {
        let r = resolver();
        assert_eq!(r.resolve("not-a-thing").unwrap(), None);
        assert_eq!(r.resolve("forest").unwrap(), None);
        assert_eq!(r.resolve("area(3)").unwrap(), None);
        assert_eq!(r.resolve("inf").unwrap(), None);
        assert_eq!(r.resolve("").unwrap(), None);
    }

    #[test]
    fn known_family_with_bad_arguments_is_an_error() {
        let r = resolver();
        assert!(matches!(
            r.resolve("gaussian(a)"),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            r.resolve("gaussian(1, 2, 3)"),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn function_call_parsing() {
        assert_eq!(
            parse_function_call("beta(2, 5)"),
            Some(vec!["beta", "2", "5"])
        );
        assert_eq!(parse_function_call("gaussian ()"), Some(vec!["gaussian"]));
        assert_eq!(parse_function_call("beta(2, 5"), None);
        assert_eq!(parse_function_call("(2, 5)"), None);
        assert_eq!(parse_function_call("2beta(1)"), None);
        assert_eq!(parse_function_call("f(g(1))"), None);
    }

    #[test]
    fn number_parsing_rejects_words_and_non_finite_values() {
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("infinity"), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("e"), None);
    }
}
