//! Error types shared across Mosaic crates.

use std::path::PathBuf;

/// Top-level error type for Mosaic operations.
#[derive(Debug, thiserror::Error)]
pub enum MosaicError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to decode photo {id}: {message}")]
    Decode { id: String, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Export failed after {attempts} attempts: {cause}")]
    ExportExhausted {
        attempts: usize,
        cause: Box<MosaicError>,
    },

    #[error("Export cancelled")]
    Cancelled,

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MosaicError.
pub type MosaicResult<T> = Result<T, MosaicError>;

impl MosaicError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn decode(id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            id: id.into(),
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// The underlying failure of an exhausted export, or `self` otherwise.
    pub fn root_cause(&self) -> &MosaicError {
        match self {
            Self::ExportExhausted { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhausted_message_includes_cause() {
        let err = MosaicError::ExportExhausted {
            attempts: 4,
            cause: Box::new(MosaicError::render("surface exceeds raster ceiling")),
        };
        let text = err.to_string();
        assert!(text.contains("4 attempts"));
        assert!(text.contains("surface exceeds raster ceiling"));
        assert!(matches!(err.root_cause(), MosaicError::Render { .. }));
    }
}
