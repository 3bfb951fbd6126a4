// Distribution checkpoint state

pub mod checkpoint;
pub mod manager;

pub use checkpoint::{CheckpointBuilder, DistributionCheckpoint, DistributionStatus};
pub use manager::StateManager;
