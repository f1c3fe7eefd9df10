use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Domain(#[from] coinlens_core::DomainError),

    #[error(transparent)]
    Fetch(#[from] coinlens_core::FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(_) => 2,
            Self::Fetch(_) => 3,
            Self::Serialization(_) => 4,
        }
    }
}
