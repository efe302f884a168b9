//! Mosaic Layout Engine
//!
//! Turns photo aspect ratios into placement rectangles:
//! - **Masonry:** column packing, each photo into the shortest column
//! - **Justified:** row packing, each row scaled to span the width
//! - **Frame:** padding and footer geometry around a finished layout
//!
//! This crate is pure computation: no I/O and no suspension points.
//! Results are recomputed from scratch on every photo-set or config change.

pub mod frame;
pub mod justified;
pub mod masonry;

pub use frame::FrameGeometry;
pub use justified::compute_justified;
pub use masonry::compute_masonry;

use mosaic_project_model::{LayoutConfig, LayoutResult, Photo};

/// Smallest extent an item may be placed at.
pub(crate) const MIN_EXTENT: f64 = 1e-6;

/// Run the packing algorithm selected by `config`.
pub fn compute_layout(photos: &[Photo], config: &LayoutConfig) -> LayoutResult {
    let result = match *config {
        LayoutConfig::Masonry {
            columns,
            gutter,
            width,
        } => compute_masonry(photos, columns, gutter, width),
        LayoutConfig::Justified {
            row_height,
            gutter,
            width,
        } => compute_justified(photos, row_height, gutter, width),
    };

    tracing::debug!(
        mode = ?config.mode(),
        photos = photos.len(),
        width = result.width,
        height = result.height,
        "Computed layout"
    );

    result
}

/// Replace a non-finite or non-positive extent with 1.
pub(crate) fn positive_or_one(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

/// Clamp a gutter to a finite, non-negative value.
pub(crate) fn clamp_gutter(gutter: f64) -> f64 {
    if gutter.is_finite() {
        gutter.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_matches_direct_calls() {
        let photos = vec![
            Photo::new("a", 300.0, 200.0),
            Photo::new("b", 200.0, 300.0),
            Photo::new("c", 400.0, 400.0),
        ];

        let masonry = compute_layout(&photos, &LayoutConfig::masonry(2, 10.0, 610.0));
        assert_eq!(masonry, compute_masonry(&photos, 2, 10.0, 610.0));

        let justified = compute_layout(&photos, &LayoutConfig::justified(150.0, 5.0, 800.0));
        assert_eq!(justified, compute_justified(&photos, 150.0, 5.0, 800.0));
    }

    #[test]
    fn test_sanitizers() {
        assert_eq!(positive_or_one(-3.0), 1.0);
        assert_eq!(positive_or_one(f64::NAN), 1.0);
        assert_eq!(positive_or_one(0.5), 0.5);
        assert_eq!(clamp_gutter(-2.0), 0.0);
        assert_eq!(clamp_gutter(f64::INFINITY), 0.0);
        assert_eq!(clamp_gutter(3.0), 3.0);
    }
}
