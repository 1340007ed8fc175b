use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Unsupported command format: {0}")]
    UnsupportedCommand(String),

    #[error("Invalid BigQuery query command. Missing SQL query.")]
    MissingSqlQuery,

    #[error("Could not tokenize command: {0}")]
    Tokenize(String),

    #[error("Failed to launch '{program}': {reason}")]
    Launch { program: String, reason: String },

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
