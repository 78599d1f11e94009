//! Tree resolver - replaces lazy leaves with concrete values.

use crate::value::Value;

use super::ResolveError;

/// Resolves one leaf to a concrete value, `None` when the leaf is absent
/// and should vanish from its parent container.
///
/// This is the seam between the structural walk and the leaf policy: the
/// plain [`LazyResolver`] only unwraps lazy values, while the options-aware
/// resolver also follows option references.
pub trait LeafResolver {
    fn resolve_leaf(&self, value: Value) -> Result<Option<Value>, ResolveError>;
}

/// The plain leaf policy: unwraps lazy chains, rejects option references.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyResolver;

impl LeafResolver for LazyResolver {
    fn resolve_leaf(&self, mut value: Value) -> Result<Option<Value>, ResolveError> {
        loop {
            match value {
                Value::Lazy(lazy) => {
                    if !lazy.is_enabled() {
                        return Ok(None);
                    }
                    value = lazy.into_value();
                }
                Value::Ref(reference) => {
                    return Err(ResolveError::unsupported(format!(
                        "option reference '{}' with no options bound",
                        reference.path()
                    )));
                }
                other => return Ok(Some(other)),
            }
        }
    }
}

/// Builder walks a tree and erases every lazy leaf: disabled leaves are
/// removed from their parent container, enabled ones are replaced by their
/// resolved value. After a successful build the tree contains no lazy
/// values and no option references at any depth.
#[derive(Debug, Clone)]
pub struct Builder<R: LeafResolver> {
    resolver: R,
}

impl Builder<LazyResolver> {
    /// Creates a builder with the plain lazy-value policy.
    pub fn new() -> Self {
        Builder {
            resolver: LazyResolver,
        }
    }
}

impl Default for Builder<LazyResolver> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<R: LeafResolver> Builder<R> {
    /// Creates a builder around a custom leaf policy.
    pub fn with_resolver(resolver: R) -> Self {
        Builder { resolver }
    }

    /// Resolves the tree in place.
    ///
    /// A standalone lazy leaf at the top level resolves directly; a
    /// disabled one becomes null. On error the tree is left partially
    /// resolved.
    pub fn build(&self, value: &mut Value) -> Result<(), ResolveError> {
        if value.is_lazy() || value.is_ref() {
            let taken = std::mem::take(value);
            *value = self.resolver.resolve_leaf(taken)?.unwrap_or(Value::Null);
        }
        self.descend(value)
    }

    /// Resolves a copy of the tree, leaving the original untouched.
    pub fn build_copy(&self, value: &Value) -> Result<Value, ResolveError> {
        let mut copy = value.clone();
        self.build(&mut copy)?;
        Ok(copy)
    }

    fn descend(&self, value: &mut Value) -> Result<(), ResolveError> {
        match value {
            Value::Map(map) => {
                // Snapshot the key set: deletions during the pass must not
                // affect which keys are visited.
                let keys: Vec<String> = map.fields.keys().cloned().collect();
                for key in keys {
                    match map.fields.remove(&key) {
                        Some(entry @ (Value::Lazy(_) | Value::Ref(_))) => {
                            if let Some(resolved) = self.resolver.resolve_leaf(entry)? {
                                map.fields.insert(key, resolved);
                            }
                        }
                        Some(entry) => {
                            map.fields.insert(key, entry);
                        }
                        None => {}
                    }
                }
                for child in map.fields.values_mut() {
                    self.descend(child)?;
                }
                Ok(())
            }
            Value::List(items) => {
                // Last to first so removals do not shift unvisited indices.
                for index in (0..items.len()).rev() {
                    if !items[index].is_lazy() && !items[index].is_ref() {
                        continue;
                    }
                    let entry = std::mem::take(&mut items[index]);
                    match self.resolver.resolve_leaf(entry)? {
                        Some(resolved) => items[index] = resolved,
                        None => {
                            items.remove(index);
                        }
                    }
                }
                for child in items.iter_mut() {
                    self.descend(child)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Resolves a lazy value to its concrete payload.
///
/// A disabled value resolves to `None`; chains of lazy values unwrap
/// transparently; anything else is returned unchanged. No structural
/// descent happens here - that is the builder's job.
pub fn resolve_value(value: Value) -> Option<Value> {
    match value {
        Value::Lazy(lazy) => {
            if !lazy.is_enabled() {
                None
            } else {
                resolve_value(lazy.into_value())
            }
        }
        other => Some(other),
    }
}

/// Like [`resolve_value`], but fails when the value is disabled and the
/// caller demanded a definite value.
pub fn resolve_value_strict(value: Value) -> Result<Value, ResolveError> {
    match value {
        Value::Lazy(lazy) => {
            if !lazy.is_enabled() {
                Err(ResolveError::Disabled)
            } else {
                resolve_value_strict(lazy.into_value())
            }
        }
        other => Ok(other),
    }
}

/// Resolves a tree in place with the plain lazy-value policy.
pub fn build_tree(value: &mut Value) -> Result<(), ResolveError> {
    Builder::new().build(value)
}

/// Resolves a copy of the tree with the plain lazy-value policy.
pub fn build_tree_copy(value: &Value) -> Result<Value, ResolveError> {
    Builder::new().build_copy(value)
}
