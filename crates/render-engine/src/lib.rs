//! Mosaic Render Engine
//!
//! Rasterizes a laid-out collage and encodes it under a platform pixel
//! budget.
//!
//! # Pipeline Architecture
//!
//! ```text
//! photos ──► AssetStore ──► LayoutEngine ──► FrameGeometry
//!                                                  │
//!                                                  ▼
//!                      PixelBudget ──► RasterSurface (preview scale)
//!                           │               │            │
//!                           ▼               ▼            ▼
//!                 AdaptiveExporter    SizeEstimator   preview
//!             (scale ladder, retries)   (debounced)
//!                           │
//!                           ▼
//!                   <product>-<date>.jpg
//! ```

pub mod budget;
pub mod estimator;
pub mod export;
pub mod exporter;
pub mod raster;
pub mod surface;

pub use budget::{PixelBudget, PlatformClass};
pub use estimator::{estimate_once, EstimateInputs, SizeEstimate, SizeEstimator};
pub use export::{export_collage, write_export, ExportRequest, PreparedCollage};
pub use exporter::{
    AdaptiveExporter, CancelFlag, ExportOutcome, ExportProgress, ExportStage, ExportTarget,
    ProgressCallback,
};
pub use raster::RasterSurface;
pub use surface::{inline_payload_len, RenderSurface, SurfaceState};
