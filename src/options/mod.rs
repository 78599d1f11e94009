//! Options module - Merged option overlays with dotted-path lookup.
//!
//! An overlay folds partial option mappings in order, later layers
//! overriding earlier ones, and resolves option references lazily on
//! lookup.

mod options;


pub use options::*;
