//! Runtime error types.

/// Common result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the driver and its handle.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The driver task is gone; its command channel is closed.
    #[error("driver is not running")]
    DriverGone,

    /// The core engine failed to resolve a turn.
    #[error("engine error: {0}")]
    Engine(#[from] battle_core::EngineError),
}
