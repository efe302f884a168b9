//! Adaptive export: rasterize and encode under a pixel budget.
//!
//! # Scale ladder
//!
//! Candidates are `safe_scale × factor` for each configured factor, followed
//! by the absolute floor scale; anything at or below the minimum is dropped.
//! With the defaults and a 0.30 safe scale that is `[0.30, 0.21, 0.15, 0.25]`.
//!
//! Attempts run strictly one after another: every attempt resizes the one
//! shared surface. The first success wins and the rest of the ladder is
//! abandoned. When all candidates fail, the error carries the last cause.
//!
//! The exporter never restores the surface; see [`crate::export::export_collage`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mosaic_common::config::LadderConfig;
use mosaic_common::error::{MosaicError, MosaicResult};
use mosaic_common::naming::EXPORT_MIME;

use crate::budget::PixelBudget;
use crate::surface::RenderSurface;

/// Progress callback for export attempts.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportProgress {
    /// 1-based attempt number.
    pub attempt: usize,

    /// Number of ladder candidates.
    pub total_attempts: usize,

    /// Scale of the current attempt.
    pub scale: f64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Encoding,
    Retrying,
    Complete,
    Failed,
}

/// Cooperative cancellation, checked before each ladder step.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What to export: full frame size and encode quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportTarget {
    pub width: u32,
    pub height: u32,
    /// Encode quality in `(0, 1]`.
    pub quality: f32,
}

/// A successful export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// Encoded `image/jpeg` bytes.
    pub blob: Vec<u8>,
    /// Scale the frame was rendered at (≤ 1).
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    /// Attempts made, including the successful one.
    pub attempts: usize,
}

/// One rung of the ladder while it is being tried.
struct ExportAttempt {
    scale: f64,
    blob: Vec<u8>,
    achieved_width: u32,
    achieved_height: u32,
}

/// Runs the scale ladder against a render surface.
#[derive(Debug, Clone)]
pub struct AdaptiveExporter {
    ladder: LadderConfig,
}

impl AdaptiveExporter {
    pub fn new(ladder: LadderConfig) -> Self {
        Self { ladder }
    }

    /// Ordered candidate scales for a given safe scale.
    pub fn scale_ladder(&self, safe_scale: f64) -> Vec<f64> {
        self.ladder
            .safe_scale_factors
            .iter()
            .map(|factor| safe_scale * factor)
            .chain(std::iter::once(self.ladder.floor_scale))
            .filter(|scale| scale.is_finite() && *scale > self.ladder.min_scale)
            .map(|scale| scale.min(1.0))
            .collect()
    }

    /// Export the target frame, retrying down the ladder on failure.
    pub async fn export<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        target: ExportTarget,
        budget: &PixelBudget,
        cancel: &CancelFlag,
        progress: Option<&ProgressCallback>,
    ) -> MosaicResult<ExportOutcome> {
        let ExportTarget {
            width,
            height,
            quality,
        } = target;
        if width == 0 || height == 0 {
            return Err(MosaicError::render(format!(
                "nothing to export: frame is {width}x{height}"
            )));
        }

        let quality = if quality.is_finite() {
            quality.clamp(0.01, 1.0)
        } else {
            1.0
        };
        let safe_scale = budget.safe_scale(width, height);
        let candidates = self.scale_ladder(safe_scale);
        let total = candidates.len();

        tracing::info!(
            width,
            height,
            ceiling = budget.ceiling(),
            safe_scale,
            ladder = ?candidates,
            "Starting adaptive export"
        );

        let report = |attempt: usize, scale: f64, stage: ExportStage| {
            if let Some(cb) = progress {
                cb(ExportProgress {
                    attempt,
                    total_attempts: total,
                    scale,
                    stage,
                });
            }
        };
        report(0, safe_scale, ExportStage::Preparing);

        let mut last_error = None;
        for (index, scale) in candidates.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(attempt = index + 1, "Export cancelled");
                return Err(MosaicError::Cancelled);
            }

            let attempt = index + 1;
            match self
                .attempt(surface, width, height, scale, quality, |stage| {
                    report(attempt, scale, stage)
                })
                .await
            {
                Ok(done) => {
                    tracing::info!(
                        attempt,
                        scale = done.scale,
                        width = done.achieved_width,
                        height = done.achieved_height,
                        bytes = done.blob.len(),
                        "Export succeeded"
                    );
                    report(attempt, done.scale, ExportStage::Complete);
                    return Ok(ExportOutcome {
                        blob: done.blob,
                        scale: done.scale,
                        width: done.achieved_width,
                        height: done.achieved_height,
                        attempts: attempt,
                    });
                }
                Err(e) => {
                    tracing::warn!(attempt, scale, error = %e, "Export attempt failed");
                    last_error = Some(e);
                    if attempt < total {
                        report(attempt, scale, ExportStage::Retrying);
                        tokio::time::sleep(self.ladder.cooldown_delay()).await;
                    }
                }
            }
        }

        report(total, 0.0, ExportStage::Failed);
        let cause = last_error
            .unwrap_or_else(|| MosaicError::render("scale ladder has no usable candidates"));
        Err(MosaicError::ExportExhausted {
            attempts: total,
            cause: Box::new(cause),
        })
    }

    async fn attempt<S: RenderSurface + ?Sized>(
        &self,
        surface: &mut S,
        width: u32,
        height: u32,
        scale: f64,
        quality: f32,
        report: impl Fn(ExportStage),
    ) -> MosaicResult<ExportAttempt> {
        let target_width = scaled(width, scale);
        let target_height = scaled(height, scale);

        report(ExportStage::Rendering);
        surface.resize(target_width, target_height)?;
        surface.set_scale(scale, scale);
        surface.force_redraw()?;

        tokio::time::sleep(self.ladder.stabilize_delay()).await;

        report(ExportStage::Encoding);
        let blob = surface.encode(EXPORT_MIME, quality)?;

        Ok(ExportAttempt {
            scale,
            blob,
            achieved_width: target_width,
            achieved_height: target_height,
        })
    }
}

impl Default for AdaptiveExporter {
    fn default() -> Self {
        Self::new(LadderConfig::default())
    }
}

/// `round(extent × scale)`. May be 0; the surface rejects empty sizes.
fn scaled(extent: u32, scale: f64) -> u32 {
    (extent as f64 * scale).round() as u32
}
