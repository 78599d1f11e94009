//! # Config Overlay
//!
//! A hierarchical configuration resolution and deep-merge engine.
//!
//! Trees of mappings and sequences may carry two special leaves: lazy
//! values that vanish or unwrap when the tree is built, and option
//! references that point into a separately merged option tree. Building a
//! tree produces a final, concrete tree suitable for serialization.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of configuration trees and their leaves
//! - [`path`] - Dotted paths identifying nested locations
//! - [`merge`] - Generic deep merge driven by an explicit policy
//! - [`resolve`] - Tree resolution, replacing or removing lazy leaves
//! - [`options`] - Merged option overlays with dotted-path lookup
//! - [`util`] - Byte-unit parsing and secret encoding helpers

pub mod merge;
pub mod options;
pub mod path;
pub mod resolve;
pub mod util;
pub mod value;

pub use merge::{merge, merge_maps, ConflictPolicy, MergeError, MergePolicy};
pub use options::{
    build_tree_with_options, build_tree_with_options_copy, OptionResolver, Options,
};
pub use path::DottedPath;
pub use resolve::{
    build_tree, build_tree_copy, resolve_value, resolve_value_strict, Builder, LazyResolver,
    LeafResolver, ResolveError,
};
pub use value::{LazyValue, Map, OptionRef, Transform, Value};
