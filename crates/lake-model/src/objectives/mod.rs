//! Objective reduction
pub mod reducer;

pub use self::reducer::{LakeObjectives, ObjectiveReducer};
