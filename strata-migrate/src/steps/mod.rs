//! Per-kind diff orchestrators.
//!
//! Each module follows the same contract: `compare(from, to)` matches
//! objects of one kind between two schema snapshots by identity key, and
//! `generate_steps(diff, schema_name)` renders the resulting diff as
//! ordered [`MigrationStep`](crate::migration::MigrationStep)s.

pub mod enums;
pub mod extensions;
pub mod indexes;
pub mod policies;
pub mod relations;
pub mod rls;
pub mod roles;
pub mod tables;
pub mod triggers;

use smol_str::SmolStr;

/// An object that belongs to a model, flattened out of the schema so it
/// can be keyed by `(model, identity)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject<T> {
    pub model: SmolStr,
    pub item: T,
}

impl<T> ModelObject<T> {
    pub fn new(model: impl Into<SmolStr>, item: T) -> Self {
        Self {
            model: model.into(),
            item,
        }
    }
}
