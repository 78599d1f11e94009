//! Merge policies - the strategy table driving the deep-merge primitive.

/// ConflictPolicy selects how an escape-hatch handler resolves two values
/// the structural rules cannot combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail with a [`MergeError`](super::MergeError) naming the conflict path.
    Fail,
    /// Keep the later value.
    TakeNext,
}

/// MergePolicy drives [`merge`](super::merge).
///
/// Mappings always merge key-wise and sequences always append; the policy
/// decides everything else. It is passed explicitly into every call - there
/// is no process-wide default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Both operands are scalars.
    pub scalar_pair: ConflictPolicy,
    /// Structural mismatch involving a container (e.g. mapping into scalar).
    pub type_conflict: ConflictPolicy,
    /// An operand is a lazy value or option reference not otherwise handled.
    pub fallback: ConflictPolicy,
    /// Replace a base option reference outright with the next value.
    pub replace_references: bool,
}

impl MergePolicy {
    /// Every collision fails, surfacing configuration mistakes instead of
    /// silently dropping one side.
    pub fn strict() -> Self {
        MergePolicy {
            scalar_pair: ConflictPolicy::Fail,
            type_conflict: ConflictPolicy::Fail,
            fallback: ConflictPolicy::Fail,
            replace_references: false,
        }
    }

    /// The option-overlay policy: scalars take the last write, an existing
    /// option reference is replaced outright, structural mismatches still
    /// fail.
    pub fn overlay() -> Self {
        MergePolicy {
            scalar_pair: ConflictPolicy::TakeNext,
            type_conflict: ConflictPolicy::Fail,
            fallback: ConflictPolicy::TakeNext,
            replace_references: true,
        }
    }

    /// The next value always wins.
    pub fn overriding() -> Self {
        MergePolicy {
            scalar_pair: ConflictPolicy::TakeNext,
            type_conflict: ConflictPolicy::TakeNext,
            fallback: ConflictPolicy::TakeNext,
            replace_references: true,
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy::strict()
    }
}
