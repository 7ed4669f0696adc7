//! Error types
//!
//! The simulation itself never fails: out-of-range queries clamp and inputs
//! aimed at a destroyed tank are ignored. Errors only arise while loading
//! configuration or wiring up the page.

use thiserror::Error;

/// Invalid or unparseable game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Fatal problem found while starting the game in the browser
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no browser window available")]
    NoWindow,
    #[error("no document available")]
    NoDocument,
    #[error("required element #{0} is missing from the page")]
    MissingElement(&'static str),
    #[error("element #{id} is not a {expected}")]
    WrongElementType {
        id: &'static str,
        expected: &'static str,
    },
    #[error("canvas #{0} has no 2d rendering context")]
    NoCanvasContext(&'static str),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
