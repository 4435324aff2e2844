#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout config: {message}")]
    Config { message: String },
    #[error("layout config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
