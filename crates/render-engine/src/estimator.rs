//! Approximate export size without a full-resolution encode.
//!
//! The interactive surface is already rendered at a preview scale. Encoding
//! it and multiplying the byte count by `(full_scale / preview_scale)²`
//! gives a usable estimate, since JPEG size tracks pixel count at a fixed
//! quality.
//!
//! Scheduling is debounced. Every call to [`SizeEstimator::schedule`] issues
//! a new token and aborts the pending timer; a sample commits only if its
//! token is still the latest when it finishes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use mosaic_common::config::EstimatorConfig;
use mosaic_common::naming::EXPORT_MIME;

use crate::budget::PixelBudget;
use crate::surface::{inline_payload_len, RenderSurface};

/// Result of a size estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeEstimate {
    /// No photos, an empty frame, a frame the budget cannot fit at any
    /// 0.05 step, or the sample could not be encoded.
    #[default]
    Unknown,
    /// Approximate export size in bytes.
    Bytes(u64),
}

impl SizeEstimate {
    pub fn bytes(self) -> Option<u64> {
        match self {
            Self::Unknown => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }
}

/// Everything an estimate depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateInputs {
    /// Number of loaded photos.
    pub asset_count: usize,
    /// Full frame width in pixels.
    pub frame_width: u32,
    /// Full frame height in pixels.
    pub frame_height: u32,
    /// Encode quality in `(0, 1]`.
    pub quality: f32,
}

/// Sample the surface once at its current (preview) scale.
pub fn estimate_once<S: RenderSurface + ?Sized>(
    surface: &mut S,
    inputs: &EstimateInputs,
    budget: &PixelBudget,
) -> SizeEstimate {
    if inputs.asset_count == 0 || inputs.frame_height == 0 || inputs.frame_width == 0 {
        return SizeEstimate::Unknown;
    }

    let (preview_scale, _) = surface.scale();
    if !preview_scale.is_finite() || preview_scale <= 0.0 {
        return SizeEstimate::Unknown;
    }

    let full_scale = budget.safe_scale(inputs.frame_width, inputs.frame_height);
    if full_scale <= 0.0 {
        tracing::debug!(
            width = inputs.frame_width,
            height = inputs.frame_height,
            ceiling = budget.ceiling(),
            "Frame too large for any budgeted scale"
        );
        return SizeEstimate::Unknown;
    }

    let data_url = match surface.encode_data_url(EXPORT_MIME, inputs.quality) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(error = %e, "Size sample failed to encode");
            return SizeEstimate::Unknown;
        }
    };
    let Some(sample_bytes) = inline_payload_len(&data_url) else {
        return SizeEstimate::Unknown;
    };

    let preview_to_full = preview_scale / full_scale;
    let estimate = sample_bytes as f64 / (preview_to_full * preview_to_full);

    SizeEstimate::Bytes(estimate.round() as u64)
}

/// Debounced, cancellable size estimation against a shared preview surface.
pub struct SizeEstimator<S> {
    surface: Arc<Mutex<S>>,
    budget: PixelBudget,
    debounce: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    result: Arc<watch::Sender<SizeEstimate>>,
}

impl<S: RenderSurface + 'static> SizeEstimator<S> {
    pub fn new(surface: Arc<Mutex<S>>, budget: PixelBudget, config: &EstimatorConfig) -> Self {
        let (tx, _) = watch::channel(SizeEstimate::Unknown);
        Self {
            surface,
            budget,
            debounce: config.debounce(),
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
            result: Arc::new(tx),
        }
    }

    /// Watch committed estimates.
    pub fn subscribe(&self) -> watch::Receiver<SizeEstimate> {
        self.result.subscribe()
    }

    /// The most recently committed estimate.
    pub fn current(&self) -> SizeEstimate {
        *self.result.borrow()
    }

    /// Token of the most recent request.
    pub fn latest_token(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Request a new estimate after the debounce interval.
    ///
    /// Any pending request is superseded. Returns the new request's token.
    pub fn schedule(&mut self, inputs: EstimateInputs) -> u64 {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let surface = Arc::clone(&self.surface);
        let latest = Arc::clone(&self.latest);
        let result = Arc::clone(&self.result);
        let budget = self.budget;
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if latest.load(Ordering::SeqCst) != token {
                return;
            }

            let guard = surface.lock_owned().await;
            let sampled = tokio::task::spawn_blocking(move || {
                let mut guard = guard;
                estimate_once(&mut *guard, &inputs, &budget)
            })
            .await
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Size sample task failed");
                SizeEstimate::Unknown
            });

            if latest.load(Ordering::SeqCst) == token {
                tracing::debug!(token, estimate = ?sampled, "Committed size estimate");
                result.send_replace(sampled);
            } else {
                tracing::debug!(token, "Discarded stale size estimate");
            }
        }));

        token
    }

    /// Drop any pending request without scheduling a new one.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<S> Drop for SizeEstimator<S> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
