use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Cannot read mapping '{path}': {reason}")]
    MappingRead { path: String, reason: String },

    #[error("Malformed mapping signature '{key}': {reason}")]
    MappingFormat { key: String, reason: String },

    #[error("Cannot decode class entry '{entry}': {reason}")]
    Decode { entry: String, reason: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Archive(_) => "ARCHIVE_ERROR",
            Error::MappingRead { .. } => "MAPPING_READ_ERROR",
            Error::MappingFormat { .. } => "MAPPING_FORMAT_ERROR",
            Error::Decode { .. } => "DECODE_ERROR",
            Error::Other(_) => "ERROR",
        }
    }

    /// Wrap a codec failure with the archive entry it occurred in.
    pub fn decode(entry: &str, err: impl std::fmt::Display) -> Self {
        Error::Decode {
            entry: entry.to_string(),
            reason: err.to_string(),
        }
    }
}
