use thiserror::Error;
use tickerlens_core::{ApiError, ConfigError, StorageError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("usage error: {0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Api(_) => 3,
            Self::Validation(_) | Self::Usage(_) => 2,
            Self::Config(_) | Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Storage(_) => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_categories() {
        assert_eq!(CliError::from(ValidationError::EmptyTicker).exit_code(), 2);
        assert_eq!(CliError::from(ApiError::from(ValidationError::ZeroLimit)).exit_code(), 3);
        assert_eq!(CliError::from(ConfigError::MissingBaseUrl).exit_code(), 4);
        assert_eq!(CliError::Usage("bad".to_owned()).exit_code(), 2);
    }
}
