//! Option reference leaves - indirections into a resolved option tree.

use std::fmt;
use std::sync::Arc;

use crate::path::DottedPath;

use super::Value;

/// Transform is a function applied to a resolved reference target.
///
/// Shared and immutable, so trees and overlays holding transforms stay
/// usable across threads.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Transform {
    /// Wraps a function.
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Transform(Arc::new(f))
    }

    /// Applies the function.
    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// OptionRef points at a dotted path in a separately resolved option tree.
///
/// Resolution looks the path up in the bound overlay, unwinds the target if
/// it is itself a lazy value or another reference, and applies the transform
/// (if any) to the resolved result.
#[derive(Debug, Clone)]
pub struct OptionRef {
    path: DottedPath,
    transform: Option<Transform>,
}

impl OptionRef {
    /// Creates a reference to a dotted path.
    pub fn new(path: impl Into<DottedPath>) -> Self {
        OptionRef {
            path: path.into(),
            transform: None,
        }
    }

    /// Attaches a transform for the resolved target.
    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Returns the referenced path.
    pub fn path(&self) -> &DottedPath {
        &self.path
    }

    /// Returns true if a transform is attached.
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Applies the transform to a resolved target value, or returns the
    /// value unchanged when no transform is attached.
    pub fn apply(&self, value: Value) -> Value {
        match &self.transform {
            Some(transform) => transform.apply(value),
            None => value,
        }
    }
}

impl PartialEq for OptionRef {
    fn eq(&self, other: &Self) -> bool {
        if self.path != other.path {
            return false;
        }
        // Functions have no structural equality; only the same shared
        // closure compares equal.
        match (&self.transform, &other.transform) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}
