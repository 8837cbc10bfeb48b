use orbis_core::{ActorId, CoreError};

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised when the simulation is driven incorrectly.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// No entity with this ID exists.
    #[error("entity not found in simulation: {0}")]
    EntityNotFound(ActorId),

    /// A tick interval was negative or not finite.
    #[error("tick interval must be finite and non-negative, got {0}")]
    InvalidInterval(f64),

    /// An error from the world state.
    #[error(transparent)]
    Core(#[from] CoreError),
}
