use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Message reported by the record store itself
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("The requested resource wasn't found.")]
    NotFound,

    #[error("unexpected record store response: {0}")]
    Decode(String),

    #[error("invalid record store url: {0}")]
    InvalidUrl(String),
}
