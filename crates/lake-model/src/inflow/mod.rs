//! Natural phosphorus inflow
pub mod generator;

pub use self::generator::{ConstantInflow, InflowMatrix, InflowSource, LogNormalInflow};
