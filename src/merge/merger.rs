//! Deep merge of mapping/sequence/scalar trees.

use std::fmt;

use crate::value::{Map, Value};

use super::{ConflictPolicy, MergePolicy};

/// MergeError reports a collision the active policy refused to resolve.
///
/// The path is the dotted location of the conflict; it is empty when the
/// conflict is at the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// Structural or scalar mismatch between two values.
    TypeConflict {
        path: String,
        base: String,
        next: String,
    },
    /// Neither operand was a container or scalar pair the strategy table
    /// handles.
    Fallback {
        path: String,
        base: String,
        next: String,
    },
}

impl MergeError {
    fn type_conflict(path: &[String], base: &Value, next: &Value) -> Self {
        MergeError::TypeConflict {
            path: path.join("."),
            base: format!("{:?}", base),
            next: format!("{:?}", next),
        }
    }

    fn fallback(path: &[String], base: &Value, next: &Value) -> Self {
        MergeError::Fallback {
            path: path.join("."),
            base: format!("{:?}", base),
            next: format!("{:?}", next),
        }
    }

    /// The dotted path of the conflict; empty at the root.
    pub fn path(&self) -> &str {
        match self {
            MergeError::TypeConflict { path, .. } => path,
            MergeError::Fallback { path, .. } => path,
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::TypeConflict { path, base, next } => {
                if path.is_empty() {
                    write!(f, "type conflict: {}, {}", base, next)
                } else {
                    write!(f, "type conflict at '{}': {}, {}", path, base, next)
                }
            }
            MergeError::Fallback { path, base, next } => {
                if path.is_empty() {
                    write!(f, "merge fallback: {}, {}", base, next)
                } else {
                    write!(f, "merge fallback at '{}': {}, {}", path, base, next)
                }
            }
        }
    }
}

impl std::error::Error for MergeError {}

/// Deep-merges `next` into `base`.
///
/// Mappings merge key-wise recursively; sequences concatenate with no
/// positional merge and no deduplication; everything else resolves through
/// `policy`. Operands are consumed: a subtree present on only one side moves
/// into the result, so base and result never alias.
///
/// Combining more than two trees is a strictly sequential left-to-right
/// fold; the operation is not associative because append order differs.
pub fn merge(base: Value, next: Value, policy: &MergePolicy) -> Result<Value, MergeError> {
    merge_at(base, next, policy, &mut Vec::new())
}

/// Deep-merges two mappings, same contract as [`merge`].
pub fn merge_maps(base: Map, next: Map, policy: &MergePolicy) -> Result<Map, MergeError> {
    merge_maps_at(base, next, policy, &mut Vec::new())
}

fn merge_at(
    base: Value,
    next: Value,
    policy: &MergePolicy,
    path: &mut Vec<String>,
) -> Result<Value, MergeError> {
    match (base, next) {
        (Value::Map(base), Value::Map(next)) => {
            Ok(Value::Map(merge_maps_at(base, next, policy, path)?))
        }
        (Value::List(mut base), Value::List(next)) => {
            base.extend(next);
            Ok(Value::List(base))
        }
        (Value::Ref(_), next) if policy.replace_references => Ok(next),
        (base, next) => {
            if base.is_scalar() && next.is_scalar() {
                match policy.scalar_pair {
                    ConflictPolicy::TakeNext => Ok(next),
                    ConflictPolicy::Fail => Err(MergeError::type_conflict(path, &base, &next)),
                }
            } else if !base.is_lazy() && !base.is_ref() && !next.is_lazy() && !next.is_ref() {
                match policy.type_conflict {
                    ConflictPolicy::TakeNext => Ok(next),
                    ConflictPolicy::Fail => Err(MergeError::type_conflict(path, &base, &next)),
                }
            } else {
                match policy.fallback {
                    ConflictPolicy::TakeNext => Ok(next),
                    ConflictPolicy::Fail => Err(MergeError::fallback(path, &base, &next)),
                }
            }
        }
    }
}

fn merge_maps_at(
    mut base: Map,
    next: Map,
    policy: &MergePolicy,
    path: &mut Vec<String>,
) -> Result<Map, MergeError> {
    for (key, next_value) in next.fields {
        match base.fields.remove(&key) {
            Some(base_value) => {
                path.push(key.clone());
                let merged = merge_at(base_value, next_value, policy, path)?;
                path.pop();
                base.fields.insert(key, merged);
            }
            None => {
                base.fields.insert(key, next_value);
            }
        }
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        let mut m = Map::new();
        for (key, value) in entries {
            m.set(key.to_string(), value);
        }
        Value::Map(m)
    }

    #[test]
    fn test_merge_nested_maps() {
        let base = map(vec![
            ("a", map(vec![("b", Value::Int(1))])),
            ("c", Value::Int(2)),
        ]);
        let next = map(vec![("a", map(vec![("d", Value::Int(3))]))]);

        let merged = merge(base, next, &MergePolicy::strict()).unwrap();
        assert_eq!(
            merged,
            map(vec![
                ("a", map(vec![("b", Value::Int(1)), ("d", Value::Int(3))])),
                ("c", Value::Int(2)),
            ])
        );
    }

    #[test]
    fn test_merge_lists_append() {
        let base = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let next = Value::List(vec![Value::Int(3)]);

        let merged = merge(base, next, &MergePolicy::strict()).unwrap();
        assert_eq!(
            merged,
            Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_scalar_pair_strict_fails() {
        let err = merge(
            map(vec![("x", Value::Int(1))]),
            map(vec![("x", Value::Int(2))]),
            &MergePolicy::strict(),
        )
        .unwrap_err();
        assert_eq!(err.path(), "x");
    }

    #[test]
    fn test_scalar_pair_overlay_takes_next() {
        let merged = merge(
            map(vec![("x", Value::Int(1))]),
            map(vec![("x", Value::String("two".into()))]),
            &MergePolicy::overlay(),
        )
        .unwrap();
        assert_eq!(merged, map(vec![("x", Value::String("two".into()))]));
    }

    #[test]
    fn test_type_conflict_at_root() {
        let err = merge(
            Value::Int(5),
            map(vec![("a", Value::Int(1))]),
            &MergePolicy::overlay(),
        )
        .unwrap_err();
        assert_eq!(err.path(), "");
        assert!(format!("{}", err).starts_with("type conflict:"));
    }

    #[test]
    fn test_type_conflict_reports_nested_path() {
        let err = merge(
            map(vec![("a", map(vec![("b", Value::Int(1))]))]),
            map(vec![("a", map(vec![("b", map(vec![("c", Value::Int(2))]))]))]),
            &MergePolicy::overlay(),
        )
        .unwrap_err();
        assert_eq!(err.path(), "a.b");
        assert!(format!("{}", err).contains("at 'a.b'"));
    }

    #[test]
    fn test_reference_replaced_by_next() {
        let base = map(vec![("x", Value::reference("x.z"))]);
        let next = map(vec![("x", Value::Int(99))]);

        let merged = merge(base, next, &MergePolicy::overlay()).unwrap();
        assert_eq!(merged, map(vec![("x", Value::Int(99))]));
    }

    #[test]
    fn test_reference_kept_without_replace() {
        let base = map(vec![("x", Value::reference("x.z"))]);
        let next = map(vec![("x", Value::Int(99))]);

        let err = merge(base, next, &MergePolicy::strict()).unwrap_err();
        assert!(matches!(err, MergeError::Fallback { .. }));
    }

    #[test]
    fn test_fallback_on_lazy_operand() {
        let base = map(vec![("x", Value::constant(Value::Int(1), true))]);
        let next = map(vec![("x", Value::Int(2))]);

        let err = merge(base.clone(), next.clone(), &MergePolicy::strict()).unwrap_err();
        assert!(matches!(err, MergeError::Fallback { .. }));

        let merged = merge(base, next, &MergePolicy::overlay()).unwrap();
        assert_eq!(merged, map(vec![("x", Value::Int(2))]));
    }

    #[test]
    fn test_next_reference_survives_overlay() {
        let base = map(vec![("x", Value::Int(1))]);
        let next = map(vec![("x", Value::reference("y.z"))]);

        let merged = merge(base, next, &MergePolicy::overlay()).unwrap();
        assert_eq!(merged, map(vec![("x", Value::reference("y.z"))]));
    }

    #[test]
    fn test_single_side_keys_move_in() {
        let base = map(vec![("only_base", Value::List(vec![Value::Int(1)]))]);
        let next = map(vec![("only_next", map(vec![("k", Value::Int(2))]))]);

        let merged = merge(base, next, &MergePolicy::strict()).unwrap();
        assert_eq!(
            merged,
            map(vec![
                ("only_base", Value::List(vec![Value::Int(1)])),
                ("only_next", map(vec![("k", Value::Int(2))])),
            ])
        );
    }
}
