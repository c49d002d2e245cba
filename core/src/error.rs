use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("width must be at least 1")]
    Width,
    #[error("height must be at least 1")]
    Height,
    #[error("mineProbability must be greater than 0 and less than 1, got {0}")]
    MineProbability(f64),
    #[error("numberClass must have a length of 9, got {0}")]
    NumberClassLength(usize),
    #[error("numberText must have a length of 9, got {0}")]
    NumberTextLength(usize),
    #[error("Malformed options: {0}")]
    Malformed(String),
}

impl OptionsError {
    /// Name of the offending option, as spelled in serialized options.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Width => Some("width"),
            Self::Height => Some("height"),
            Self::MineProbability(_) => Some("mineProbability"),
            Self::NumberClassLength(_) => Some("numberClass"),
            Self::NumberTextLength(_) => Some("numberText"),
            Self::Malformed(_) => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Could not encode value for {key}: {message}")]
    Encode { key: String, message: String },
    #[error("Could not decode value for {key}: {message}")]
    Decode { key: String, message: String },
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type Result<T> = core::result::Result<T, OptionsError>;
