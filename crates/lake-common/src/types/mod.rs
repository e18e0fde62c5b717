//! Core data types for the lake study

pub mod decision;
pub mod evaluation;
pub mod lake_params;
