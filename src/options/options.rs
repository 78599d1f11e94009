//! Options overlay - a merged option tree with dotted-path lookup.

use once_cell::sync::Lazy;

use crate::merge::{merge_maps, MergeError, MergePolicy};
use crate::path::DottedPath;
use crate::resolve::{Builder, LeafResolver, ResolveError};
use crate::value::{Map, Value};

/// The values [`Options::get_or`] treats as unset.
static DEFAULT_EMPTY_VALUES: Lazy<[Value; 2]> =
    Lazy::new(|| [Value::Null, Value::String(String::new())]);

/// Options is an option tree built by deep-merging partial mappings in
/// order, with dotted-path lookup.
///
/// Later layers override earlier ones: mappings merge key-wise, sequences
/// append, scalars take the last write, and an existing option reference is
/// replaced outright. Cross-references within the tree are permitted and
/// resolve lazily on lookup, not eagerly at build time. The tree is
/// read-only after construction and may be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Options {
    tree: Map,
}

impl Options {
    /// Builds an overlay by folding the layers left to right over an empty
    /// mapping.
    pub fn new(layers: impl IntoIterator<Item = Map>) -> Result<Self, MergeError> {
        let mut tree = Map::new();
        for layer in layers {
            tree = merge_maps(tree, layer, &MergePolicy::overlay())?;
        }
        Ok(Options { tree })
    }

    /// Like [`Options::new`], skipping absent layers.
    pub fn from_partials(
        layers: impl IntoIterator<Item = Option<Map>>,
    ) -> Result<Self, MergeError> {
        Options::new(layers.into_iter().flatten())
    }

    /// The merged option tree.
    pub fn tree(&self) -> &Map {
        &self.tree
    }

    /// Whether every segment of the dotted path resolves to an existing
    /// key. Intermediate leaves are not resolved; no partial paths are
    /// created.
    pub fn has(&self, path: &str) -> bool {
        self.lookup(&DottedPath::new(path)).is_ok()
    }

    /// Looks up the dotted path and fully resolves the result: lazy chains
    /// unwrap and references follow transparently, through further lazy
    /// values and references. An absent result surfaces as null.
    pub fn get(&self, path: &str) -> Result<Value, ResolveError> {
        let path = DottedPath::new(path);
        let raw = self.lookup(&path)?.clone();
        let mut visited = vec![path];
        Ok(self.resolve_with(raw, &mut visited)?.unwrap_or(Value::Null))
    }

    /// Like [`Options::get`], returning `default` when the path is missing
    /// or the resolved value is null or an empty string.
    pub fn get_or(&self, path: &str, default: Value) -> Result<Value, ResolveError> {
        self.get_or_custom(path, default, &*DEFAULT_EMPTY_VALUES)
    }

    /// Like [`Options::get`], returning `default` when the path is missing
    /// or the resolved value is a member of `empty_values`.
    pub fn get_or_custom(
        &self,
        path: &str,
        default: Value,
        empty_values: &[Value],
    ) -> Result<Value, ResolveError> {
        if !self.has(path) {
            return Ok(default);
        }
        let value = self.get(path)?;
        if empty_values.contains(&value) {
            return Ok(default);
        }
        Ok(value)
    }

    /// Resolves one leaf against this overlay: lazy chains unwrap,
    /// references follow with cycle detection. `None` means the leaf is
    /// absent and should vanish from its parent container.
    pub fn resolve(&self, value: Value) -> Result<Option<Value>, ResolveError> {
        let mut visited = Vec::new();
        self.resolve_with(value, &mut visited)
    }

    fn resolve_with(
        &self,
        value: Value,
        visited: &mut Vec<DottedPath>,
    ) -> Result<Option<Value>, ResolveError> {
        match value {
            Value::Lazy(lazy) => {
                if !lazy.is_enabled() {
                    return Ok(None);
                }
                self.resolve_with(lazy.into_value(), visited)
            }
            Value::Ref(reference) => {
                if visited.contains(reference.path()) {
                    return Err(ResolveError::cyclic(reference.path().to_string()));
                }
                visited.push(reference.path().clone());
                let target = self.lookup(reference.path())?.clone();
                match self.resolve_with(target, visited)? {
                    None => Ok(None),
                    Some(resolved) => {
                        let transformed = reference.apply(resolved);
                        if transformed.is_lazy() || transformed.is_ref() {
                            // A transform may hand back another indirection;
                            // keep unwinding under the same visited set.
                            self.resolve_with(transformed, visited)
                        } else {
                            Ok(Some(transformed))
                        }
                    }
                }
            }
            other => Ok(Some(other)),
        }
    }

    /// Raw dotted-path walk; intermediate leaves are not resolved.
    fn lookup(&self, path: &DottedPath) -> Result<&Value, ResolveError> {
        let mut segments = path.iter();
        let first = segments
            .next()
            .ok_or_else(|| ResolveError::not_found(path.to_string()))?;
        let mut current = self
            .tree
            .get(first)
            .ok_or_else(|| ResolveError::not_found(path.to_string()))?;
        for segment in segments {
            current = match current {
                Value::Map(map) => map
                    .get(segment)
                    .ok_or_else(|| ResolveError::not_found(path.to_string()))?,
                _ => return Err(ResolveError::not_found(path.to_string())),
            };
        }
        Ok(current)
    }
}

/// The options-aware leaf policy: follows option references against a bound
/// overlay, then applies the usual lazy delete/replace rule.
#[derive(Debug, Clone, Copy)]
pub struct OptionResolver<'a> {
    options: &'a Options,
}

impl<'a> OptionResolver<'a> {
    /// Binds the overlay.
    pub fn new(options: &'a Options) -> Self {
        OptionResolver { options }
    }
}

impl LeafResolver for OptionResolver<'_> {
    fn resolve_leaf(&self, value: Value) -> Result<Option<Value>, ResolveError> {
        self.options.resolve(value)
    }
}

/// Resolves a tree in place, following option references against `options`.
pub fn build_tree_with_options(options: &Options, value: &mut Value) -> Result<(), ResolveError> {
    Builder::with_resolver(OptionResolver::new(options)).build(value)
}

/// Resolves a copy of the tree, following option references against
/// `options`. The original is left untouched.
pub fn build_tree_with_options_copy(
    options: &Options,
    value: &Value,
) -> Result<Value, ResolveError> {
    Builder::with_resolver(OptionResolver::new(options)).build_copy(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(entries: Vec<(&str, Value)>) -> Map {
        let mut m = Map::new();
        for (key, value) in entries {
            m.set(key.to_string(), value);
        }
        m
    }

    #[test]
    fn test_has_and_get() {
        let options = Options::new([layer(vec![(
            "x",
            Value::Map(layer(vec![("y", Value::Int(14))])),
        )])])
        .unwrap();

        assert!(options.has("x"));
        assert!(options.has("x.y"));
        assert!(!options.has("x.z"));
        assert!(!options.has("q"));
        assert!(!options.has(""));
        assert_eq!(options.get("x.y").unwrap(), Value::Int(14));
    }

    #[test]
    fn test_get_missing_path_fails() {
        let options = Options::new([layer(vec![("x", Value::Int(1))])]).unwrap();
        assert_eq!(
            options.get("x.y").unwrap_err(),
            ResolveError::not_found("x.y")
        );
        assert_eq!(options.get("q").unwrap_err(), ResolveError::not_found("q"));
    }

    #[test]
    fn test_get_or_defaults() {
        let options = Options::new([layer(vec![
            ("set", Value::Int(5)),
            ("null", Value::Null),
            ("blank", Value::String(String::new())),
        ])])
        .unwrap();

        assert_eq!(options.get_or("set", Value::Int(0)).unwrap(), Value::Int(5));
        assert_eq!(
            options.get_or("missing", Value::Int(0)).unwrap(),
            Value::Int(0)
        );
        assert_eq!(options.get_or("null", Value::Int(0)).unwrap(), Value::Int(0));
        assert_eq!(
            options.get_or("blank", Value::Int(0)).unwrap(),
            Value::Int(0)
        );
    }

    #[test]
    fn test_get_or_custom_empty_set() {
        let options = Options::new([layer(vec![("x", Value::Int(-1))])]).unwrap();

        assert_eq!(
            options
                .get_or_custom("x", Value::Int(7), &[Value::Int(-1)])
                .unwrap(),
            Value::Int(7)
        );
        assert_eq!(
            options.get_or_custom("x", Value::Int(7), &[]).unwrap(),
            Value::Int(-1)
        );
    }

    #[test]
    fn test_from_partials_skips_absent_layers() {
        let options = Options::from_partials([
            Some(layer(vec![("a", Value::Int(1))])),
            None,
            Some(layer(vec![("b", Value::Int(2))])),
        ])
        .unwrap();

        assert_eq!(options.get("a").unwrap(), Value::Int(1));
        assert_eq!(options.get("b").unwrap(), Value::Int(2));
    }
}
