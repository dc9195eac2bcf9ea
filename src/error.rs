//! Error type shared by the deck store, rating parser and review driver.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("Invalid rating '{0}': expected 0-5 or 's' to suspend")]
    InvalidRating(String),

    #[error("Quality {0} is out of range 0-5")]
    InvalidQuality(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
