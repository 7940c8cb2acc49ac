#[cfg(feature = "stl-io")]
pub mod stl;

use crate::errors::CutError;

/// Generic I/O errors of the file based cut.
///
/// Geometry problems found while cutting a file are wrapped in
/// [`IoError::Cut`].
#[derive(Debug)]
pub enum IoError {
    StdIo(std::io::Error),

    MalformedInput(String),

    Cut(CutError),
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use IoError::*;

        match self {
            StdIo(error) => write!(f, "std::io::Error: {error}"),

            MalformedInput(msg) => write!(f, "Input is malformed: {msg}"),

            Cut(error) => write!(f, "Cut failed: {error}"),
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::StdIo(error) => Some(error),
            IoError::Cut(error) => Some(error),
            IoError::MalformedInput(_) => None,
        }
    }
}

impl From<std::io::Error> for IoError {
    fn from(value: std::io::Error) -> Self {
        Self::StdIo(value)
    }
}

impl From<CutError> for IoError {
    fn from(value: CutError) -> Self {
        Self::Cut(value)
    }
}
