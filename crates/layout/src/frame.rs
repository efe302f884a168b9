//! Frame geometry around a finished layout.

use mosaic_project_model::{FrameStyle, LayoutItem, LayoutResult};

/// An axis-aligned rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The full exportable composite: layout inset by padding, plus footer band.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGeometry {
    /// Full frame width.
    pub width: f64,
    /// Full frame height.
    pub height: f64,
    /// Layout items translated into frame coordinates.
    pub items: Vec<LayoutItem>,
    /// Footer band, if the style has one.
    pub footer: Option<FrameRect>,
}

impl FrameGeometry {
    pub fn new(layout: &LayoutResult, style: &FrameStyle) -> Self {
        let padding = style.padding();
        let footer_height = style.footer_height();

        let width = layout.width + 2.0 * padding;
        let body_height = layout.height + 2.0 * padding;

        let footer = style.has_footer().then_some(FrameRect {
            x: 0.0,
            y: body_height,
            width,
            height: footer_height,
        });

        Self {
            width,
            height: body_height + footer_height,
            items: layout
                .items
                .iter()
                .map(|item| item.offset(padding, padding))
                .collect(),
            footer,
        }
    }

    /// Frame size in whole pixels (rounded up).
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.width), to_pixels(self.height))
    }
}

fn to_pixels(extent: f64) -> u32 {
    if extent.is_finite() && extent > 0.0 {
        extent.ceil().min(u32::MAX as f64) as u32
    } else {
        0
    }
}
