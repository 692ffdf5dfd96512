//! Structured, non-fatal notifications attached to generation results.
//!
//! Problems that should not abort a whole request (a dropped cell, an unsupported category,
//! an attribute that failed to resolve) are reported as [`Notification`]s next to whatever
//! partial output was produced.
use std::fmt;

/// Severity of a [`Notification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A message with a severity and the context it arose in.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Notification {
    pub level: Level,
    /// Context string (e.g. request identifier, cell, attribute key).
    pub context: String,
    /// Human-readable message.
    pub message: String,
}

impl Notification {
    pub fn new(level: Level, context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn info(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Info, context, message)
    }

    pub fn warning(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Warning, context, message)
    }

    pub fn error(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Level::Error, context, message)
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.level, self.context, self.message)
    }
}
