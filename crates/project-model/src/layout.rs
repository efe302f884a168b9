//! Layout configuration and placement results.

use serde::{Deserialize, Serialize};

/// A placed photo. Derived from a [`crate::Photo`]; never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Id of the photo this rectangle belongs to.
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Placed width (> 0).
    pub width: f64,
    /// Placed height (> 0).
    pub height: f64,
}

impl LayoutItem {
    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }
}

/// Output of a packing algorithm.
///
/// `width` is always the requested target width; `height` is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub width: f64,
    pub height: f64,
    /// Items in input photo order.
    pub items: Vec<LayoutItem>,
}

impl LayoutResult {
    /// A layout with no items.
    pub fn empty(width: f64) -> Self {
        Self {
            width,
            height: 0.0,
            items: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lowest item edge, 0 for an empty layout.
    pub fn content_bottom(&self) -> f64 {
        self.items
            .iter()
            .map(LayoutItem::bottom)
            .fold(0.0, f64::max)
    }

    /// Find the placement of a photo by id.
    pub fn item(&self, id: &str) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Which packing algorithm to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    Masonry,
    Justified,
}

impl LayoutMode {
    /// Parse a mode name as given on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "masonry" => Some(Self::Masonry),
            "justified" => Some(Self::Justified),
            _ => None,
        }
    }
}

/// Packing configuration.
///
/// Out-of-range values are clamped by the engine, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutConfig {
    /// Column packing: each photo goes into the shortest column.
    Masonry {
        /// Column count (≥ 1).
        columns: u32,
        /// Spacing between columns and between stacked photos (≥ 0).
        gutter: f64,
        /// Target layout width (> 0).
        width: f64,
    },
    /// Row packing: each row is scaled to span the width.
    Justified {
        /// Target row height (> 0).
        row_height: f64,
        /// Spacing between photos in a row and between rows (≥ 0).
        gutter: f64,
        /// Target layout width (> 0).
        width: f64,
    },
}

impl LayoutConfig {
    pub fn masonry(columns: u32, gutter: f64, width: f64) -> Self {
        Self::Masonry {
            columns,
            gutter,
            width,
        }
    }

    pub fn justified(row_height: f64, gutter: f64, width: f64) -> Self {
        Self::Justified {
            row_height,
            gutter,
            width,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        match self {
            Self::Masonry { .. } => LayoutMode::Masonry,
            Self::Justified { .. } => LayoutMode::Justified,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::masonry(3, 8.0, 2400.0)
    }
}
