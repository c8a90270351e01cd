use thiserror::Error;

/// Errors surfaced by the simulation core to its callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown direction '{0}' (expected east, west, north or south)")]
    UnknownDirection(String),
    /// A manual phase change was requested while automatic timing is active.
    /// Nothing was changed.
    #[error("manual signal control is not enabled for scenario '{scenario}'")]
    ManualControlDisabled { scenario: String },
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}
