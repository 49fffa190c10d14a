use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Candidate retrieval failed: {0}")]
    Retrieval(String),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    #[error("Artisan not found: {0}")]
    ArtisanNotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn retrieval(message: impl Into<String>) -> Self {
        Error::Retrieval(message.into())
    }

    /// Client-side errors are never worth retrying.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::ArtisanNotFound(_)
                | Error::Geocoding(GeocodingError::AddressNotFound(_))
        )
    }
}

/// Failures of the address-to-coordinate collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodingError {
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),
}
