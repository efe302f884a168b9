//! Estimate the exported size of a collage.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mosaic_assets::ImageDecoder;
use mosaic_common::config::AppConfig;
use mosaic_project_model::CollageDocument;
use mosaic_render_engine::{PreparedCollage, SizeEstimate, SizeEstimator};
use tokio::sync::Mutex;

use super::{budget_for, format_bytes, quality_for};

pub async fn run(
    config: &AppConfig,
    path: PathBuf,
    quality: Option<String>,
    platform: Option<String>,
) -> anyhow::Result<()> {
    let doc = CollageDocument::load(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load collage: {e}"))?;
    let quality = quality_for(quality.as_deref(), doc.quality)?;
    let budget = budget_for(config, platform.as_deref())?;

    let decoder = Arc::new(ImageDecoder::new(config.export.max_import_width));
    let prepared = PreparedCollage::from_document(&doc, decoder).await?;
    let inputs = prepared.estimate_inputs(quality);
    let (width, height) = prepared.frame_size();
    let scale = budget.safe_scale(width, height);

    let surface = Arc::new(Mutex::new(
        prepared.surface(config.estimator.preview_scale),
    ));
    let mut estimator = SizeEstimator::new(surface, budget, &config.estimator);
    let mut updates = estimator.subscribe();
    estimator.schedule(inputs);

    let wait = config.estimator.debounce() + Duration::from_secs(60);
    let estimate = match tokio::time::timeout(wait, updates.changed()).await {
        Ok(Ok(())) => *updates.borrow(),
        _ => SizeEstimate::Unknown,
    };

    println!("Collage: {}", path.display());
    println!("  Photos: {}", inputs.asset_count);
    println!("  Frame: {width}x{height}");
    println!(
        "  Export size: {}x{} (scale {scale:.2})",
        (width as f64 * scale).round(),
        (height as f64 * scale).round()
    );
    println!("  Quality: {quality:?}");
    match estimate {
        SizeEstimate::Bytes(bytes) => println!("  Estimated size: ~{}", format_bytes(bytes)),
        SizeEstimate::Unknown => println!("  Estimated size: unknown"),
    }

    Ok(())
}
