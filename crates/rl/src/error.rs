use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlError {
    #[error("invalid trainer config: {0}")]
    InvalidConfig(String),
    #[error("state vector has {got} elements, expected {expected}")]
    StateSize { expected: usize, got: usize },
    #[error("action index {index} out of range for {num_actions} actions")]
    ActionOutOfRange { index: usize, num_actions: usize },
    #[error("rollout buffer already holds {capacity} transitions; train before observing more")]
    BufferFull { capacity: usize },
    #[error("config could not be parsed")]
    ConfigParse(#[from] serde_json::Error),
    #[error("environment failed")]
    Environment(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}
