use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("unknown style property '{0}'")]
    UnknownProperty(String),
    #[error("property '{property}' expects {expected:?}, got {actual:?}")]
    KindMismatch {
        property: String,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("invalid target path: {0}")]
    InvalidPath(String),
}
