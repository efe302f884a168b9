//! Frame styling: outer padding, footer band and background.

use serde::{Deserialize, Serialize};

/// The exportable frame around a layout.
///
/// The layout area is inset by `padding` on every side; an optional footer
/// band of `footer_height` sits below the bottom padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    /// Outer padding in pixels (≥ 0).
    pub padding: f64,
    /// Footer band height in pixels (≥ 0, 0 = no footer).
    pub footer_height: f64,
    /// Background RGB.
    pub background: [u8; 3],
    /// Footer band RGB.
    pub footer_color: [u8; 3],
}

impl FrameStyle {
    /// Padding clamped to ≥ 0.
    pub fn padding(&self) -> f64 {
        non_negative(self.padding)
    }

    /// Footer height clamped to ≥ 0.
    pub fn footer_height(&self) -> f64 {
        non_negative(self.footer_height)
    }

    pub fn has_footer(&self) -> bool {
        self.footer_height() > 0.0
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            padding: 24.0,
            footer_height: 0.0,
            background: [255, 255, 255],
            footer_color: [240, 240, 240],
        }
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_values_clamp() {
        let style = FrameStyle {
            padding: -5.0,
            footer_height: f64::INFINITY,
            ..FrameStyle::default()
        };
        assert_eq!(style.padding(), 0.0);
        assert_eq!(style.footer_height(), 0.0);
        assert!(!style.has_footer());
    }
}
