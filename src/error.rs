use thiserror::Error;

use crate::surface::DisplayMode;

/// Errors surfaced by the overlay controller.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// A mode-changing call was made from a state that cannot honor it. The
    /// controller stays in the state it was in before the call.
    #[error("cannot {action} while {from:?}")]
    InvalidStateTransition {
        from: DisplayMode,
        action: &'static str,
    },
    #[error("geometry persistence failed: {0}")]
    PersistenceFailure(#[from] StoreError),
    #[error("screen bounds are not available")]
    BoundsUnavailable,
    #[error("invalid overlay configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("geometry store i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("geometry store format error: {0}")]
    Format(#[from] serde_json::Error),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
