//! Resolution errors.

use thiserror::Error;

/// ResolveError represents a failure while resolving a tree or an option
/// lookup. All variants abort the whole call; no partial result is
/// returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A strict resolve demanded a definite value, but the value is
    /// disabled.
    #[error("value is disabled")]
    Disabled,

    /// An option reference points at a path with no entry in the option
    /// tree.
    #[error("option not found: '{path}'")]
    NotFound { path: String },

    /// A chain of option references revisited a path.
    #[error("cyclic option reference through '{path}'")]
    CyclicReference { path: String },

    /// A leaf the active resolver does not recognize.
    #[error("unsupported leaf: {detail}")]
    UnsupportedLeaf { detail: String },
}

impl ResolveError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        ResolveError::NotFound { path: path.into() }
    }

    /// Creates a cyclic-reference error.
    pub fn cyclic(path: impl Into<String>) -> Self {
        ResolveError::CyclicReference { path: path.into() }
    }

    /// Creates an unsupported-leaf error.
    pub fn unsupported(detail: impl Into<String>) -> Self {
        ResolveError::UnsupportedLeaf {
            detail: detail.into(),
        }
    }
}
