use crate::entity::ActorId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised when the world state is misused at its boundary.
///
/// World conditions such as an out-of-reach target or an unsatisfied recipe
/// are not errors; they resolve to empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity with this ID is already registered.
    #[error("actor id already in use: {0}")]
    DuplicateId(ActorId),

    /// A codename did not match any known entity kind.
    #[error("unknown entity codename: \"{0}\"")]
    UnknownCodename(String),

    /// A world snapshot could not be parsed.
    #[error("invalid world snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
