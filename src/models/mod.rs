//! Data models for the study quiz application.
//!
//! Wire names are camelCase to match the browser client exactly.

mod quiz;
mod streak;
mod topic;

pub use quiz::*;
pub use streak::*;
pub use topic::*;

/// Entities that belong to exactly one user.
///
/// Used by the ownership check in the API layer so topic and quiz lookups
/// share one code path.
pub trait Owned {
    fn owner_id(&self) -> &str;
}
