//! Masonry column packing.
//!
//! # Algorithm
//!
//! 1. Split the width into `columns` equal content columns separated by `gutter`.
//! 2. For each photo in order, pick the column with the lowest running height.
//!    Ties go to the lowest column index, which keeps layouts visually stable.
//! 3. Scale the photo to the column width, preserving its aspect ratio exactly.
//! 4. Advance that column by the placed height plus one gutter.

use mosaic_project_model::{LayoutItem, LayoutResult, Photo};

use crate::{clamp_gutter, positive_or_one, MIN_EXTENT};

/// Pack photos into `columns` columns spanning `width`.
pub fn compute_masonry(photos: &[Photo], columns: u32, gutter: f64, width: f64) -> LayoutResult {
    let columns = columns.max(1) as usize;
    let gutter = clamp_gutter(gutter);
    let width = positive_or_one(width);

    let column_width =
        ((width - gutter * (columns - 1) as f64) / columns as f64).max(MIN_EXTENT);

    let mut heights = vec![0.0_f64; columns];
    let mut items = Vec::with_capacity(photos.len());

    for photo in photos {
        let column = shortest_column(&heights);
        let placed_height = (photo.inverse_aspect_ratio() * column_width).max(MIN_EXTENT);

        items.push(LayoutItem {
            id: photo.id.clone(),
            x: column as f64 * (column_width + gutter),
            y: heights[column],
            width: column_width,
            height: placed_height,
        });

        heights[column] += placed_height + gutter;
    }

    let tallest = heights.iter().copied().fold(0.0, f64::max);

    LayoutResult {
        width,
        height: (tallest - gutter).max(0.0),
        items,
    }
}

/// Index of the shortest column; the first one wins ties.
fn shortest_column(heights: &[f64]) -> usize {
    let mut best = 0;
    for (index, height) in heights.iter().enumerate().skip(1) {
        if *height < heights[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: &str) -> Photo {
        Photo::new(id, 100.0, 100.0)
    }

    #[test]
    fn test_empty_input() {
        let result = compute_masonry(&[], 3, 10.0, 900.0);
        assert_eq!(result.width, 900.0);
        assert_eq!(result.height, 0.0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_ties_pick_lowest_column() {
        // Uniform heights: every round ties, so placement cycles 0, 1, 0, 1.
        let photos: Vec<Photo> = ["a", "b", "c", "d"].iter().map(|id| square(id)).collect();
        let result = compute_masonry(&photos, 2, 10.0, 210.0);

        let xs: Vec<f64> = result.items.iter().map(|i| i.x).collect();
        assert_eq!(xs, vec![0.0, 110.0, 0.0, 110.0]);

        let ys: Vec<f64> = result.items.iter().map(|i| i.y).collect();
        assert_eq!(ys, vec![0.0, 0.0, 110.0, 110.0]);

        assert!((result.height - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_column_receives_next_photo() {
        let photos = vec![
            Photo::new("tall", 100.0, 300.0),
            Photo::new("wide", 200.0, 100.0),
            Photo::new("next", 100.0, 100.0),
        ];
        let result = compute_masonry(&photos, 2, 0.0, 200.0);

        // Column width 100: tall -> col 0 (h 300), wide -> col 1 (h 50), next -> col 1.
        let next = result.item("next").unwrap();
        assert_eq!(next.x, 100.0);
        assert!((next.y - 50.0).abs() < 1e-9);
        assert!((result.height - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_columns_clamps_to_one() {
        let photos = vec![square("a"), square("b")];
        let result = compute_masonry(&photos, 0, -4.0, 50.0);
        assert!(result.items.iter().all(|i| i.x == 0.0 && i.width == 50.0));
        assert!((result.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let photos = vec![Photo::new("p", 4000.0, 3000.0)];
        let result = compute_masonry(&photos, 3, 12.0, 1000.0);
        let item = &result.items[0];
        assert!((item.height / item.width - 0.75).abs() < 1e-9);
    }
}
