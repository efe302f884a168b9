//! Collage documents (`collage.json`).
//!
//! A document ties together the photo sources, the packing configuration,
//! the frame style and the export quality. Photo paths are resolved
//! relative to the directory containing the document.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::frame::FrameStyle;
use crate::layout::LayoutConfig;
use crate::photo::MAX_PHOTOS;
use mosaic_common::config::QualityPreset;

/// One photo source in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSource {
    /// Unique identifier. Defaults to the file stem when omitted.
    #[serde(default)]
    pub id: String,
    /// Image file path.
    pub path: PathBuf,
}

/// Top-level collage document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageDocument {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Photo sources in placement order.
    pub photos: Vec<PhotoSource>,

    /// Packing configuration.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Frame around the layout.
    #[serde(default)]
    pub frame: FrameStyle,

    /// Export quality.
    #[serde(default)]
    pub quality: QualityPreset,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Errors that can occur when working with collage documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid collage: {message}")]
    ValidationError { message: String },
}

impl CollageDocument {
    /// Build a document from a list of image paths.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>, layout: LayoutConfig) -> Self {
        let mut doc = Self {
            version: default_version(),
            photos: paths
                .into_iter()
                .map(|path| PhotoSource {
                    id: String::new(),
                    path,
                })
                .collect(),
            layout,
            frame: FrameStyle::default(),
            quality: QualityPreset::default(),
        };
        doc.assign_missing_ids();
        doc
    }

    /// Load a document, resolving photo paths against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DocumentError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut doc: CollageDocument =
            serde_json::from_str(&json).map_err(|e| DocumentError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for photo in &mut doc.photos {
            if photo.path.is_relative() {
                photo.path = base.join(&photo.path);
            }
        }

        doc.assign_missing_ids();
        doc.validate()?;
        Ok(doc)
    }

    /// Save the document as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| DocumentError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| DocumentError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check photo count and id uniqueness.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.photos.len() > MAX_PHOTOS {
            return Err(DocumentError::ValidationError {
                message: format!(
                    "{} photos given, at most {MAX_PHOTOS} supported",
                    self.photos.len()
                ),
            });
        }

        let mut seen = HashSet::new();
        for photo in &self.photos {
            if !seen.insert(photo.id.as_str()) {
                return Err(DocumentError::ValidationError {
                    message: format!("duplicate photo id '{}'", photo.id),
                });
            }
        }
        Ok(())
    }

    /// Fill empty ids from file stems, suffixing repeats with `-2`, `-3`, ...
    fn assign_missing_ids(&mut self) {
        let mut taken: HashSet<String> = self
            .photos
            .iter()
            .filter(|p| !p.id.is_empty())
            .map(|p| p.id.clone())
            .collect();

        for photo in &mut self.photos {
            if !photo.id.is_empty() {
                continue;
            }
            let stem = photo
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "photo".to_string());

            let mut candidate = stem.clone();
            let mut n = 2;
            while taken.contains(&candidate) {
                candidate = format!("{stem}-{n}");
                n += 1;
            }
            taken.insert(candidate.clone());
            photo.id = candidate;
        }
    }
}
