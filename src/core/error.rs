use thiserror::Error;

#[derive(Error, Debug)]
pub enum WildError {
    #[error("Herd not found: {0:?}")]
    HerdNotFound(crate::core::types::HerdId),

    #[error("Animal not found in any herd: {0:?}")]
    AnimalNotFound(crate::core::types::AnimalId),

    #[error("No passable tile available for placement near {0:?}")]
    NoPassableTile(crate::core::types::TileCoord),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WildError>;
