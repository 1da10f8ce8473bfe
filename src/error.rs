use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestockerError {
    #[error("No venues found in {}. Nothing to process.", .0.display())]
    NoVenues(PathBuf),

    #[error("Venue not found in config: {0}")]
    VenueNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
