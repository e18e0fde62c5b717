//! Lake-state simulation
pub mod simulator;

pub use self::simulator::{LakeSimulator, TrialAccumulators};
