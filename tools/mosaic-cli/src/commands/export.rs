//! Export a collage to a JPEG.

use std::path::PathBuf;
use std::sync::Arc;

use mosaic_assets::ImageDecoder;
use mosaic_common::config::AppConfig;
use mosaic_project_model::CollageDocument;
use mosaic_render_engine::{
    export_collage, write_export, CancelFlag, ExportProgress, ExportRequest, ExportStage,
    PreparedCollage, ProgressCallback,
};

use super::{budget_for, format_bytes, quality_for};

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    output: Option<PathBuf>,
    quality: Option<String>,
    platform: Option<String>,
    raster_ceiling: Option<u64>,
) -> anyhow::Result<()> {
    println!("Exporting collage: {}", path.display());

    let doc = CollageDocument::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load collage: {e}"))?;
    let quality = quality_for(quality.as_deref(), doc.quality)?;
    let budget = budget_for(config, platform.as_deref())?;
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let decoder = Arc::new(ImageDecoder::new(config.export.max_import_width));
    let prepared = PreparedCollage::from_document(&doc, decoder).await?;
    if prepared.store.is_empty() {
        anyhow::bail!("No photos could be decoded");
    }
    for failure in &prepared.failures {
        println!("  Skipped: {failure}");
    }

    let target = prepared.export_target(quality);
    println!("  Frame: {}x{}", target.width, target.height);
    println!("  Pixel ceiling: {} px", budget.ceiling());

    let mut surface = prepared.surface(config.estimator.preview_scale);
    if let Some(pixels) = raster_ceiling {
        surface = surface.with_raster_ceiling(pixels);
    }

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| match p.stage {
        ExportStage::Rendering => println!(
            "  Attempt {}/{} at scale {:.3}",
            p.attempt, p.total_attempts, p.scale
        ),
        ExportStage::Retrying => println!("    failed, retrying smaller"),
        _ => {}
    });

    let request = ExportRequest {
        target,
        budget,
        ladder: config.ladder.clone(),
    };

    match export_collage(&mut surface, &request, &cancel, Some(progress_cb)).await {
        Ok(outcome) => {
            let written = write_export(&outcome, &output_dir, &config.export.product)?;
            println!(
                "Export complete: {} ({}x{}, {})",
                written.display(),
                outcome.width,
                outcome.height,
                format_bytes(outcome.blob.len() as u64)
            );
        }
        Err(e) => anyhow::bail!("Export failed: {e}"),
    }

    Ok(())
}
