//! Mosaic Assets
//!
//! Decoding of source photos into bounded-resolution rasters, and the
//! arena that owns those rasters for the lifetime of a collage.
//!
//! Decoded handles are released exactly once, after they have left the
//! active set *and* every export or estimate lease on them has been dropped.

pub mod decoder;
pub mod store;

pub use decoder::{
    decode_sources, probe_dimensions, AssetDecoder, DecodedImage, ImageDecoder,
    MAX_CONCURRENT_DECODES,
};
pub use store::{AssetLease, AssetStore};
