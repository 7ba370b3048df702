use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("parameter shape mismatch: {0}")]
    ShapeMismatch(&'static str),
    #[error("parameter blob i/o failed")]
    Io(#[from] std::io::Error),
}
