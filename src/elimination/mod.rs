//! Forward elimination on a fixed worker pool.
//!
//! Every pivot row runs three phases (multiplier, correction, apply) whose
//! sub-tasks write pairwise distinct cells, so workers never synchronize
//! with one another inside a phase, only at the latch between phases.

pub mod config;
pub mod kernel;
pub mod latch;
pub mod phase;
pub mod scheduler;
pub mod worker;

pub use config::{EngineConfig, MAX_DIMENSION};
pub use phase::{CellCoordinates, Phase, PhaseTask};
pub use scheduler::{eliminate, EliminationReport, PhaseActivation, Scheduler};
