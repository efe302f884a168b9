//! Photo identity and dimensions.

use serde::{Deserialize, Serialize};

/// Maximum number of photos a single collage accepts.
pub const MAX_PHOTOS: usize = 100;

/// A photo as seen by the layout engine: an id and its pixel dimensions.
///
/// The raster itself belongs to the asset layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique identifier within a collage.
    pub id: String,
    /// Width in pixels (> 0).
    pub width: f64,
    /// Height in pixels (> 0).
    pub height: f64,
}

impl Photo {
    /// Create a photo, replacing non-positive or non-finite dimensions with 1.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width: sanitize_dimension(width),
            height: sanitize_dimension(height),
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        sanitize_dimension(self.width) / sanitize_dimension(self.height)
    }

    /// Height divided by width.
    pub fn inverse_aspect_ratio(&self) -> f64 {
        sanitize_dimension(self.height) / sanitize_dimension(self.width)
    }
}

fn sanitize_dimension(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio() {
        let photo = Photo::new("a", 400.0, 300.0);
        assert!((photo.aspect_ratio() - 4.0 / 3.0).abs() < 1e-12);
        assert!((photo.inverse_aspect_ratio() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_dimensions_are_clamped() {
        let photo = Photo::new("b", 0.0, f64::NAN);
        assert_eq!(photo.width, 1.0);
        assert_eq!(photo.height, 1.0);
        assert_eq!(photo.aspect_ratio(), 1.0);
    }

    #[test]
    fn test_fractional_dimensions_survive() {
        let photo = Photo::new("c", 0.5, 2.0);
        assert_eq!(photo.width, 0.5);
        assert!((photo.aspect_ratio() - 0.25).abs() < 1e-12);
    }

    proptest::proptest! {
        #[test]
        fn prop_dimensions_are_always_usable(
            w in proptest::num::f64::ANY,
            h in proptest::num::f64::ANY,
        ) {
            let photo = Photo::new("p", w, h);
            proptest::prop_assert!(photo.width.is_finite() && photo.width > 0.0);
            proptest::prop_assert!(photo.height.is_finite() && photo.height > 0.0);
        }

        #[test]
        fn prop_ratios_are_reciprocal(w in 1e-3f64..1e6, h in 1e-3f64..1e6) {
            let photo = Photo::new("p", w, h);
            let product = photo.aspect_ratio() * photo.inverse_aspect_ratio();
            proptest::prop_assert!((product - 1.0).abs() < 1e-9);
        }
    }
}
