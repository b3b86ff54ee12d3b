use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    // JSON/parsing errors
    #[error("Failed to parse asset manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid asset manifest: {message}")]
    InvalidManifest { message: String },

    // Translated constraints that the target grammar rejects
    #[error("Invalid version constraint \"{constraint}\" for dependency {dependency}")]
    InvalidConstraint { dependency: String, constraint: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssetError>;
