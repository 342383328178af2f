pub mod matrix;
pub mod store;

pub use matrix::AugmentedMatrix;
pub use store::MatrixStore;
