//! Justified row packing.
//!
//! Photos accumulate into a pending row until the row, laid out at the
//! target height, would reach the layout width. The row is then rescaled to
//! its ideal height, clamped to `[0.75, 1.25]` of the target so one extreme
//! panorama or portrait cannot produce a degenerate row. The trailing row is
//! never stretched: it keeps the smaller of the target and its ideal height.
//!
//! Clamped rows do not span the width exactly.

use mosaic_project_model::{LayoutItem, LayoutResult, Photo};

use crate::{clamp_gutter, positive_or_one, MIN_EXTENT};

/// Lower bound of a non-final row, as a fraction of the target height.
pub const MIN_ROW_FACTOR: f64 = 0.75;

/// Upper bound of a non-final row, as a fraction of the target height.
pub const MAX_ROW_FACTOR: f64 = 1.25;

/// Pack photos into rows of roughly `row_height` spanning `width`.
pub fn compute_justified(
    photos: &[Photo],
    row_height: f64,
    gutter: f64,
    width: f64,
) -> LayoutResult {
    let row_height = positive_or_one(row_height);
    let gutter = clamp_gutter(gutter);
    let width = positive_or_one(width);

    let mut items = Vec::with_capacity(photos.len());
    let mut row: Vec<&Photo> = Vec::new();
    let mut aspect_sum = 0.0;
    let mut cursor = 0.0;

    for (index, photo) in photos.iter().enumerate() {
        row.push(photo);
        aspect_sum += photo.aspect_ratio();

        let gaps = gutter * (row.len() - 1) as f64;
        let virtual_width = row_height * aspect_sum + gaps;
        let is_last = index + 1 == photos.len();

        if virtual_width >= width || is_last {
            let ideal_height = (width - gaps) / aspect_sum;
            let resolved_height = if is_last {
                row_height.min(ideal_height).max(MIN_EXTENT)
            } else {
                ideal_height.clamp(MIN_ROW_FACTOR * row_height, MAX_ROW_FACTOR * row_height)
            };

            let mut x = 0.0;
            for member in row.drain(..) {
                let item_width = (resolved_height * member.aspect_ratio()).max(MIN_EXTENT);
                items.push(LayoutItem {
                    id: member.id.clone(),
                    x,
                    y: cursor,
                    width: item_width,
                    height: resolved_height,
                });
                x += item_width + gutter;
            }

            cursor += resolved_height + gutter;
            aspect_sum = 0.0;
        }
    }

    LayoutResult {
        width,
        height: (cursor - gutter).max(0.0),
        items,
    }
}
