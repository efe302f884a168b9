//! Arena of decoded photos.
//!
//! The store is the only place decoded rasters are created. Readers (the
//! exporter, the size estimator, the preview) hold [`AssetLease`]s. A raster
//! leaves the active set on `remove`, `replace_all` or `clear`, but the
//! decoder's `release` runs only when the last lease on it is dropped.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use mosaic_common::error::{MosaicError, MosaicResult};
use mosaic_project_model::{Photo, MAX_PHOTOS};

use crate::decoder::{AssetDecoder, DecodedImage};

struct Asset {
    image: DecodedImage,
    decoder: Arc<dyn AssetDecoder>,
}

impl Drop for Asset {
    fn drop(&mut self) {
        self.decoder.release(&self.image);
    }
}

/// Shared read access to a decoded photo.
#[derive(Clone)]
pub struct AssetLease(Arc<Asset>);

impl AssetLease {
    pub fn image(&self) -> &DecodedImage {
        &self.0.image
    }

    /// Photo dimensions as seen by the layout engine.
    pub fn photo(&self) -> Photo {
        let image = self.image();
        Photo::new(image.id.clone(), image.width as f64, image.height as f64)
    }
}

impl Deref for AssetLease {
    type Target = DecodedImage;

    fn deref(&self) -> &DecodedImage {
        self.image()
    }
}

impl fmt::Debug for AssetLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetLease")
            .field("id", &self.0.image.id)
            .field("width", &self.0.image.width)
            .field("height", &self.0.image.height)
            .finish()
    }
}

/// The active photo set, in insertion order.
pub struct AssetStore {
    decoder: Arc<dyn AssetDecoder>,
    active: Vec<AssetLease>,
}

impl AssetStore {
    pub fn new(decoder: Arc<dyn AssetDecoder>) -> Self {
        Self {
            decoder,
            active: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Decode and add one photo. A photo with the same id is replaced.
    pub fn load(&mut self, id: &str, bytes: &[u8]) -> MosaicResult<Photo> {
        if self.position(id).is_none() {
            self.ensure_capacity()?;
        }
        let image = self.decoder.decode(id, bytes)?;
        self.insert(image)
    }

    /// Decode a batch. Every source gets its own result.
    pub fn load_all<'a>(
        &mut self,
        sources: impl IntoIterator<Item = (&'a str, &'a [u8])>,
    ) -> Vec<MosaicResult<Photo>> {
        sources
            .into_iter()
            .map(|(id, bytes)| self.load(id, bytes))
            .collect()
    }

    /// Take ownership of an already decoded raster.
    pub fn insert(&mut self, image: DecodedImage) -> MosaicResult<Photo> {
        let existing = self.position(&image.id);
        if existing.is_none() {
            self.ensure_capacity()?;
        }

        let lease = AssetLease(Arc::new(Asset {
            image,
            decoder: Arc::clone(&self.decoder),
        }));
        let photo = lease.photo();

        match existing {
            Some(index) => self.active[index] = lease,
            None => self.active.push(lease),
        }
        Ok(photo)
    }

    /// Replace the whole set with newly decoded rasters.
    pub fn replace_all(&mut self, images: Vec<DecodedImage>) -> Vec<MosaicResult<Photo>> {
        self.clear();
        images.into_iter().map(|image| self.insert(image)).collect()
    }

    /// Remove a photo from the active set. Returns whether it was present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.active.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every photo from the active set.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Read lease on one photo.
    pub fn lease(&self, id: &str) -> Option<AssetLease> {
        self.position(id).map(|index| self.active[index].clone())
    }

    /// Read leases on every photo, in order.
    pub fn leases(&self) -> Vec<AssetLease> {
        self.active.clone()
    }

    /// Photo dimensions for layout, in order.
    pub fn photos(&self) -> Vec<Photo> {
        self.active.iter().map(AssetLease::photo).collect()
    }

    fn ensure_capacity(&self) -> MosaicResult<()> {
        if self.active.len() >= MAX_PHOTOS {
            return Err(MosaicError::config(format!(
                "collage already holds {MAX_PHOTOS} photos"
            )));
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.active.iter().position(|lease| lease.image().id == id)
    }
}

impl fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetStore")
            .field("decoder", &self.decoder.name())
            .field("active", &self.active)
            .finish()
    }
}
