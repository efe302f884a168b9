//! Export jobs: from a collage document to a written JPEG.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mosaic_assets::{decode_sources, AssetDecoder, AssetStore};
use mosaic_common::config::LadderConfig;
use mosaic_common::error::{MosaicError, MosaicResult};
use mosaic_common::naming::export_file_name_today;
use mosaic_layout::{compute_layout, FrameGeometry};
use mosaic_project_model::{CollageDocument, FrameStyle, LayoutResult, QualityPreset};

use crate::budget::PixelBudget;
use crate::estimator::EstimateInputs;
use crate::exporter::{AdaptiveExporter, CancelFlag, ExportOutcome, ExportTarget, ProgressCallback};
use crate::raster::RasterSurface;
use crate::surface::RenderSurface;

/// Everything the adaptive exporter needs for one run.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub target: ExportTarget,
    pub budget: PixelBudget,
    pub ladder: LadderConfig,
}

/// Run the adaptive exporter and put the surface back afterwards.
///
/// The surface is restored to its prior size and scale whether the export
/// succeeds, exhausts the ladder or is cancelled. Holding `&mut S` for the
/// whole call keeps the preview and the estimator off the surface meanwhile.
pub async fn export_collage<S: RenderSurface + ?Sized>(
    surface: &mut S,
    request: &ExportRequest,
    cancel: &CancelFlag,
    progress: Option<ProgressCallback>,
) -> MosaicResult<ExportOutcome> {
    let saved = surface.snapshot();
    let exporter = AdaptiveExporter::new(request.ladder.clone());

    let result = exporter
        .export(
            surface,
            request.target,
            &request.budget,
            cancel,
            progress.as_ref(),
        )
        .await;

    if let Err(e) = surface.restore(&saved) {
        tracing::warn!(
            width = saved.width,
            height = saved.height,
            error = %e,
            "Failed to restore surface after export"
        );
    }

    result
}

/// Write an export into `dir` as `<product>-<date>.jpg`.
pub fn write_export(outcome: &ExportOutcome, dir: &Path, product: &str) -> MosaicResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name_today(product));
    std::fs::write(&path, &outcome.blob)?;
    tracing::info!(
        path = %path.display(),
        bytes = outcome.blob.len(),
        scale = outcome.scale,
        "Wrote export"
    );
    Ok(path)
}

/// A decoded and laid-out collage, ready for preview, estimate or export.
#[derive(Debug)]
pub struct PreparedCollage {
    pub store: AssetStore,
    pub layout: LayoutResult,
    pub frame: FrameGeometry,
    pub style: FrameStyle,
    pub quality: QualityPreset,
    /// Photos that failed to decode; the rest of the collage is unaffected.
    pub failures: Vec<MosaicError>,
}

impl PreparedCollage {
    /// Decode every photo of `doc` and compute its layout.
    pub async fn from_document(
        doc: &CollageDocument,
        decoder: Arc<dyn AssetDecoder>,
    ) -> MosaicResult<Self> {
        doc.validate().map_err(|e| MosaicError::config(e.to_string()))?;

        let sources = doc
            .photos
            .iter()
            .map(|photo| (photo.id.clone(), photo.path.clone()))
            .collect();

        let mut store = AssetStore::new(Arc::clone(&decoder));
        let mut failures = Vec::new();
        for result in decode_sources(decoder, sources).await {
            match result.and_then(|image| store.insert(image)) {
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping photo");
                    failures.push(e);
                }
            }
        }

        let layout = compute_layout(&store.photos(), &doc.layout);
        let frame = FrameGeometry::new(&layout, &doc.frame);

        Ok(Self {
            store,
            layout,
            frame,
            style: doc.frame,
            quality: doc.quality,
            failures,
        })
    }

    /// Full frame size in pixels.
    pub fn frame_size(&self) -> (u32, u32) {
        self.frame.pixel_size()
    }

    /// A surface rendering this collage at `scale`.
    pub fn surface(&self, scale: f64) -> RasterSurface {
        RasterSurface::with_scale(
            self.frame.clone(),
            self.style,
            self.store.leases(),
            scale,
        )
    }

    /// Export target for this collage's frame.
    pub fn export_target(&self, quality: QualityPreset) -> ExportTarget {
        let (width, height) = self.frame_size();
        ExportTarget {
            width,
            height,
            quality: quality.quality(),
        }
    }

    /// Estimator inputs for this collage.
    pub fn estimate_inputs(&self, quality: QualityPreset) -> EstimateInputs {
        let (frame_width, frame_height) = self.frame_size();
        EstimateInputs {
            asset_count: self.store.len(),
            frame_width,
            frame_height,
            quality: quality.quality(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgb, RgbImage};
    use mosaic_assets::ImageDecoder;
    use mosaic_project_model::LayoutConfig;

    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(path, buf).unwrap();
    }

    #[tokio::test]
    async fn test_prepare_skips_broken_photos() {
        let dir = std::env::temp_dir().join("mosaic_test_prepare");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        write_png(&dir.join("a.png"), 40, 30);
        write_png(&dir.join("b.png"), 30, 40);
        std::fs::write(dir.join("c.png"), b"nope").unwrap();

        let doc = CollageDocument::from_paths(
            vec![dir.join("a.png"), dir.join("c.png"), dir.join("b.png")],
            LayoutConfig::masonry(2, 4.0, 204.0),
        );
        let prepared = PreparedCollage::from_document(&doc, Arc::new(ImageDecoder::new(1024)))
            .await
            .unwrap();

        assert_eq!(prepared.store.len(), 2);
        assert_eq!(prepared.failures.len(), 1);
        assert_eq!(prepared.layout.items.len(), 2);
        assert_eq!(prepared.layout.width, 204.0);

        let inputs = prepared.estimate_inputs(QualityPreset::High);
        assert_eq!(inputs.asset_count, 2);
        assert_eq!((inputs.frame_width, inputs.frame_height), prepared.frame_size());

        std::fs::remove_dir_all(&dir).ok();
    }
}
