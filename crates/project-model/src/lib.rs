//! Mosaic Project Model
//!
//! Defines the core data contracts for Mosaic collages:
//! - **Photos:** Identity plus pixel dimensions, the only thing layout reads
//! - **Layout:** Packing configuration and the placement rectangles it yields
//! - **Frame:** Outer padding and optional footer band around the layout
//! - **Document:** A serializable collage description (`collage.json`)
//!
//! All layout coordinates share one frame anchored at `(0, 0)` and are
//! expressed in full-resolution output pixels.

pub mod document;
pub mod frame;
pub mod layout;
pub mod photo;

pub use document::*;
pub use frame::*;
pub use layout::*;
pub use mosaic_common::config::QualityPreset;
pub use photo::*;
