//! Photo decoding.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use image::RgbImage;
use mosaic_common::error::{MosaicError, MosaicResult};
use tokio::sync::Semaphore;

/// A decoded raster, opaque RGB8.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Photo id this raster belongs to.
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub pixels: RgbImage,
}

impl DecodedImage {
    pub fn new(id: impl Into<String>, pixels: RgbImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            id: id.into(),
            width,
            height,
            pixels,
        }
    }
}

/// Turns raw image bytes into decoded rasters and releases them again.
pub trait AssetDecoder: Send + Sync {
    /// Decode `bytes` for photo `id`.
    fn decode(&self, id: &str, bytes: &[u8]) -> MosaicResult<DecodedImage>;

    /// Called exactly once per decoded raster, after its last reader is gone.
    fn release(&self, image: &DecodedImage);

    /// Decoder name.
    fn name(&self) -> &str;
}

/// Decoder backed by the `image` crate.
///
/// Photos wider than `max_import_width` are downscaled at decode time.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    max_import_width: u32,
}

impl ImageDecoder {
    pub fn new(max_import_width: u32) -> Self {
        Self {
            max_import_width: max_import_width.max(1),
        }
    }
}

impl AssetDecoder for ImageDecoder {
    fn decode(&self, id: &str, bytes: &[u8]) -> MosaicResult<DecodedImage> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| MosaicError::decode(id, e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(MosaicError::decode(id, "image has zero width or height"));
        }

        let decoded = if width > self.max_import_width {
            let target_height = ((height as f64 * self.max_import_width as f64 / width as f64)
                .round() as u32)
                .max(1);
            tracing::debug!(
                id,
                from_width = width,
                to_width = self.max_import_width,
                "Downscaling photo at import"
            );
            decoded.resize_exact(self.max_import_width, target_height, FilterType::Triangle)
        } else {
            decoded
        };

        Ok(DecodedImage::new(id, decoded.to_rgb8()))
    }

    fn release(&self, image: &DecodedImage) {
        tracing::trace!(id = %image.id, "Released decoded photo");
    }

    fn name(&self) -> &str {
        "image"
    }
}

/// Read only the pixel dimensions of an image file.
pub fn probe_dimensions(path: &Path) -> MosaicResult<(u32, u32)> {
    if !path.exists() {
        return Err(MosaicError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    image::image_dimensions(path)
        .map_err(|e| MosaicError::decode(path.display().to_string(), e.to_string()))
}

/// Most decodes [`decode_sources`] runs at once.
pub const MAX_CONCURRENT_DECODES: usize = 4;

/// Read and decode each `(id, path)` on the blocking pool.
///
/// At most [`MAX_CONCURRENT_DECODES`] full-resolution originals are in memory
/// at a time. Results keep input order; one failure never affects its
/// siblings.
pub async fn decode_sources(
    decoder: Arc<dyn AssetDecoder>,
    sources: Vec<(String, PathBuf)>,
) -> Vec<MosaicResult<DecodedImage>> {
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_DECODES));
    let mut handles = Vec::with_capacity(sources.len());
    for (id, path) in sources {
        // The semaphore is never closed.
        let permit = Arc::clone(&permits).acquire_owned().await.ok();
        let decoder = Arc::clone(&decoder);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let bytes = std::fs::read(&path)
                .map_err(|e| MosaicError::decode(&id, format!("{}: {e}", path.display())))?;
            decoder.decode(&id, &bytes)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(MosaicError::Other(e.into())),
        });
    }
    results
}
