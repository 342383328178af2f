use std::io;

use thiserror::Error;

use crate::elimination::phase::Phase;

/// Failures surfaced by the elimination engine and its caller-side checks.
#[derive(Debug, Error)]
pub enum EliminationError {
    #[error("invalid matrix dimension {size}, expected a value in 1..={max}")]
    InvalidDimension { size: usize, max: usize },

    #[error("row {row} holds {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("phase requested {requested} workers but the pool holds {capacity}")]
    PoolCapacity { requested: usize, capacity: usize },

    #[error("pivot at row {row} is {value}, too close to zero for unpivoted elimination")]
    SingularPivot { row: usize, value: f64 },

    #[error("failed to spawn elimination worker {id}")]
    WorkerSpawn {
        id: usize,
        #[source]
        source: io::Error,
    },

    #[error("elimination worker {id} panicked")]
    WorkerPanicked { id: usize },

    #[error("elimination worker {id} stopped listening for signals")]
    WorkerDisconnected { id: usize },

    #[error("phase {phase} of pivot {pivot} was aborted by a panicking worker")]
    PhaseAborted { phase: Phase, pivot: usize },

    #[error("elimination failed and shutting down the pool failed too: {shutdown}")]
    ShutdownAfterFailure {
        #[source]
        failure: Box<EliminationError>,
        shutdown: Box<EliminationError>,
    },

    #[error("matrix store is still shared after every worker was joined")]
    StoreStillShared,

    #[error("value at row {row}, column {column} is not finite")]
    NonFinite { row: usize, column: usize },
}
