use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown vote position code: {0}")]
    UnknownPosition(u8),

    #[error("unknown vote position label: {0:?}")]
    UnknownPositionLabel(String),
}
