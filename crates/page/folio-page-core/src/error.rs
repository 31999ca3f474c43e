use folio_motion::MotionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Motion(#[from] MotionError),

    #[error("unknown section '{0}'")]
    UnknownSection(String),

    #[error("duplicate section id '{0}'")]
    DuplicateSection(String),

    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}
