//! Error types for timeline and binding construction.

use folio_api_core::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum MotionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("unknown ease '{0}'")]
    UnknownEase(String),

    #[error("invalid duration {duration} for '{target}'")]
    InvalidDuration { target: String, duration: f32 },

    #[error("invalid position '{0}'")]
    InvalidPosition(String),

    #[error("invalid scroll threshold '{0}'")]
    InvalidThreshold(String),

    #[error("exit threshold '{exit}' is stricter than start '{start}'")]
    StrictExit { start: String, exit: String },

    #[error("invalid toggle actions '{0}': expected four of play|pause|resume|reverse|restart|reset|complete|none")]
    InvalidToggleActions(String),
}
