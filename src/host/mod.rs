//! Caller-side collaborators of the engine: reading and writing systems,
//! precondition checks, and the sequential back-substitution pass.

pub mod back_substitution;
pub mod system_io;
pub mod validation;

pub use back_substitution::BackwardsSubstitution;
pub use system_io::{parse_system, read_system_file, write_system, write_system_file};
pub use validation::{validate_system, PIVOT_TOLERANCE};
