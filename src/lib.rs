pub mod augmented_matrix;
pub mod elimination;
pub mod error;
pub mod host;
#[cfg(test)]
mod test_support;

pub use augmented_matrix::AugmentedMatrix;
pub use elimination::{eliminate, EliminationReport, EngineConfig, Scheduler};
pub use error::EliminationError;
