mod common;

use std::sync::{Arc, Mutex};

use common::MockSurface;
use mosaic_common::config::LadderConfig;
use mosaic_common::error::MosaicError;
use mosaic_render_engine::{
    export_collage, CancelFlag, ExportProgress, ExportRequest, ExportStage, ExportTarget,
    PixelBudget, ProgressCallback, RenderSurface,
};

fn request() -> ExportRequest {
    ExportRequest {
        target: ExportTarget {
            width: 3600,
            height: 2400,
            quality: 0.9,
        },
        budget: PixelBudget::new(1_000_000),
        ladder: LadderConfig::default(),
    }
}

fn recorder() -> (Arc<Mutex<Vec<ExportProgress>>>, ProgressCallback) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let cb: ProgressCallback = Box::new(move |p| sink.lock().unwrap().push(p));
    (log, cb)
}

#[tokio::test(start_paused = true)]
async fn first_candidate_is_the_floored_safe_scale() {
    let mut surface = MockSurface::new(900, 600, 0.25);
    let outcome = export_collage(&mut surface, &request(), &CancelFlag::new(), None)
        .await
        .unwrap();

    assert_eq!(outcome.scale, 0.3);
    assert_eq!((outcome.width, outcome.height), (1080, 720));
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.blob.len(), (777_600.0 * 0.9f32 as f64).round() as usize);
    assert_eq!(surface.resizes[0], (1080, 720));
}

#[tokio::test(start_paused = true)]
async fn retries_walk_the_ladder_in_order() {
    // 1080x720 and 756x504 are too large; 540x360 fits.
    let mut surface = MockSurface::new(900, 600, 0.25).with_max_pixels(200_000);
    let (log, cb) = recorder();

    let outcome = export_collage(&mut surface, &request(), &CancelFlag::new(), Some(cb))
        .await
        .unwrap();

    assert!((outcome.scale - 0.15).abs() < 1e-9);
    assert_eq!((outcome.width, outcome.height), (540, 360));
    assert_eq!(outcome.attempts, 3);
    assert_eq!(
        surface.resizes,
        vec![(1080, 720), (756, 504), (540, 360), (900, 600)]
    );

    let log = log.lock().unwrap();
    assert_eq!(log.first().map(|p| p.stage), Some(ExportStage::Preparing));
    assert_eq!(log.last().map(|p| p.stage), Some(ExportStage::Complete));
    let retries = log
        .iter()
        .filter(|p| p.stage == ExportStage::Retrying)
        .count();
    assert_eq!(retries, 2);
    assert!(log.iter().all(|p| p.total_attempts == 4));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_restores_surface_and_keeps_last_cause() {
    let mut surface = MockSurface::new(900, 600, 0.25).with_max_pixels(10);
    let before = surface.snapshot();

    let err = export_collage(&mut surface, &request(), &CancelFlag::new(), None)
        .await
        .unwrap_err();

    match &err {
        MosaicError::ExportExhausted { attempts, cause } => {
            assert_eq!(*attempts, 4);
            // The last candidate is the 0.25 floor: 900x600.
            assert!(cause.to_string().contains("900x600"), "{cause}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(surface.snapshot(), before);
    assert_eq!(surface.resizes.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn encoder_failures_are_retried_too() {
    let mut surface = MockSurface::new(900, 600, 0.25);
    surface.fail_encode = true;

    let err = export_collage(&mut surface, &request(), &CancelFlag::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err.root_cause(), MosaicError::Encode { .. }));
    assert_eq!(
        surface.encodes.load(std::sync::atomic::Ordering::SeqCst),
        4
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_is_checked_between_attempts() {
    let mut surface = MockSurface::new(900, 600, 0.25).with_max_pixels(10);
    let cancel = CancelFlag::new();
    let trigger = cancel.clone();
    let cb: ProgressCallback = Box::new(move |p| {
        if p.stage == ExportStage::Retrying {
            trigger.cancel();
        }
    });

    let err = export_collage(&mut surface, &request(), &cancel, Some(cb))
        .await
        .unwrap_err();

    assert!(matches!(err, MosaicError::Cancelled));
    // One failed attempt, then the restore.
    assert_eq!(surface.resizes, vec![(1080, 720), (900, 600)]);
    assert_eq!(surface.scale(), (0.25, 0.25));
}

#[tokio::test(start_paused = true)]
async fn full_scale_when_frame_fits_budget() {
    let mut surface = MockSurface::new(100, 50, 0.5);
    let request = ExportRequest {
        target: ExportTarget {
            width: 200,
            height: 100,
            quality: 1.0,
        },
        budget: PixelBudget::new(1_000_000),
        ladder: LadderConfig::default(),
    };

    let outcome = export_collage(&mut surface, &request, &CancelFlag::new(), None)
        .await
        .unwrap();
    assert_eq!(outcome.scale, 1.0);
    assert_eq!((outcome.width, outcome.height), (200, 100));
    assert_eq!(surface.size(), (100, 50));
}

#[tokio::test(start_paused = true)]
async fn empty_frame_is_rejected_without_touching_surface() {
    let mut surface = MockSurface::new(10, 10, 1.0);
    let mut request = request();
    request.target.height = 0;

    let err = export_collage(&mut surface, &request, &CancelFlag::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, MosaicError::Render { .. }));
    // Only the restore resize happened.
    assert_eq!(surface.resizes, vec![(10, 10)]);
}
