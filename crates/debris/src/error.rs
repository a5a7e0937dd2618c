use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebrisError {
    #[error("failed to spawn debris worker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("debris worker is not running")]
    Disconnected,
    #[error("malformed debris message: {0}")]
    Codec(#[from] serde_json::Error),
}
