use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use photobooth_core::processing::codec;
use photobooth_core::storage::metadata::read_metadata;
use photobooth_core::{
    BoothConfiguration, BoothError, CompositeConfig, CountdownPlan, DirectoryDownload,
    ExportFile, ExportOutcome, Exporter, FrameStyle, MemoryOverlay, Photobooth, ShareTarget,
    StartOutcome, StripCompositor, StripLayout, TextRenderer, TickMode,
};
use photobooth_local::test_pattern::{LEFT_COLOR, RIGHT_COLOR};
use photobooth_local::{StillImageCamera, TestPatternCamera};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(dir: &std::path::Path, tick_mode: TickMode) -> BoothConfiguration {
    BoothConfiguration {
        tick_mode,
        output_directory: dir.to_path_buf(),
        ..Default::default()
    }
}

fn close(a: &Rgba<u8>, b: &Rgba<u8>) -> bool {
    (0..3).all(|c| (a[c] as i32 - b[c] as i32).abs() <= 30)
}

#[test]
fn burst_composite_and_download() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut booth = Photobooth::new(
        TestPatternCamera::new(120, 90),
        config(dir.path(), TickMode::Thread(Duration::from_millis(5))),
    )
    .unwrap();
    booth.open_camera().unwrap();

    assert_eq!(
        booth.start_countdown(CountdownPlan::burst()).unwrap(),
        StartOutcome::Started
    );
    assert_eq!(
        booth.start_countdown(CountdownPlan::burst()).unwrap(),
        StartOutcome::AlreadyRunning
    );
    assert!(booth.wait_until_idle(Duration::from_secs(10)));
    assert!(booth.snapshot().is_complete());

    // Captures are mirrored: the red half of the feed ends up on the right.
    let first = codec::decode(&booth.frames()[0].bytes).unwrap();
    assert!(close(first.get_pixel(5, 5), &RIGHT_COLOR));
    assert!(close(first.get_pixel(114, 5), &LEFT_COLOR));

    let strip = booth
        .composite(&CompositeConfig::new("Graduation", FrameStyle::Plain))
        .unwrap();
    let layout = StripLayout::for_style(FrameStyle::Plain, 120, 90);
    assert_eq!((strip.width, strip.height), (layout.width(), layout.height()));

    let first_export = booth.export(&strip).unwrap();
    let second_export = booth.export(&strip).unwrap();
    assert_ne!(first_export.file_name(), second_export.file_name());

    let ExportOutcome::Downloaded { file_name, path } = first_export else {
        panic!("expected a download");
    };
    assert!(file_name.starts_with("photobooth_") && file_name.ends_with(".jpg"));
    assert!(!file_name.starts_with("photobooth_framed_"));

    let saved = codec::decode(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(saved.dimensions(), (strip.width, strip.height));

    let metadata = read_metadata(&path).unwrap();
    assert_eq!(metadata.caption, "Graduation");
    assert_eq!(metadata.file_name, file_name);
}

#[test]
fn manual_single_shots_then_framed_strip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut booth = Photobooth::new(TestPatternCamera::new(64, 48), config(dir.path(), TickMode::Manual))
        .unwrap();
    booth.open_camera().unwrap();

    for expected in 1..=3 {
        booth.start_countdown(CountdownPlan::single()).unwrap();
        assert_eq!(booth.snapshot().countdown.remaining(), Some(3));
        for _ in 0..3 {
            booth.tick();
        }
        assert_eq!(booth.snapshot().frames_captured, expected);
    }

    let overlay = RgbaImage::from_fn(8, 8, |x, _| {
        if x < 4 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([255, 215, 0, 255])
        }
    });
    booth.set_compositor(
        StripCompositor::new(TextRenderer::bundled().unwrap())
            .with_overlay(Arc::new(MemoryOverlay::new(overlay)), Duration::from_secs(5)),
    );

    let strip = booth
        .composite(&CompositeConfig::new("", FrameStyle::OverlayFramed))
        .unwrap();
    let layout = StripLayout::for_style(FrameStyle::OverlayFramed, 64, 48);
    assert_eq!((strip.width, strip.height), (layout.width(), layout.height()));

    let outcome = booth.export(&strip).unwrap();
    assert!(outcome.file_name().starts_with("photobooth_framed_"));
    assert!(outcome.file_name().ends_with(".png"));
}

#[test]
fn overlay_missing_on_disk_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(dir.path(), TickMode::Manual);
    cfg.overlay_path = Some(dir.path().join("missing-overlay.png"));
    cfg.overlay_timeout = Duration::from_secs(2);

    let mut booth = Photobooth::new(TestPatternCamera::new(16, 12), cfg).unwrap();
    booth.open_camera().unwrap();
    for _ in 0..3 {
        booth.capture_now().unwrap();
    }

    let err = booth
        .composite(&CompositeConfig::new("hi", FrameStyle::OverlayFramed))
        .unwrap_err();
    assert!(matches!(err, BoothError::OverlayLoadFailed(_)));

    // The plain style still works with the same session.
    booth
        .composite(&CompositeConfig::new("hi", FrameStyle::Plain))
        .unwrap();
}

struct ChannelShare {
    tx: Mutex<mpsc::Sender<String>>,
}

impl ShareTarget for ChannelShare {
    fn can_share_files(&self) -> bool {
        true
    }

    fn share(&self, file: &ExportFile) -> Result<(), BoothError> {
        self.tx.lock().send(file.file_name.clone()).ok();
        Ok(())
    }
}

#[test]
fn share_target_is_preferred_over_download() {
    let dir = tempfile::tempdir().unwrap();
    let mut booth = Photobooth::new(TestPatternCamera::new(16, 12), config(dir.path(), TickMode::Manual))
        .unwrap();
    booth.open_camera().unwrap();
    for _ in 0..3 {
        booth.capture_now().unwrap();
    }

    let (tx, rx) = mpsc::channel();
    booth.set_share_target(Arc::new(ChannelShare { tx: Mutex::new(tx) }));

    let strip = booth.composite(&CompositeConfig::default()).unwrap();
    let outcome = booth.export(&strip).unwrap();

    assert!(matches!(outcome, ExportOutcome::Shared { .. }));
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), outcome.file_name());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn still_image_camera_drives_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let shots = dir.path().join("shots");
    std::fs::create_dir(&shots).unwrap();
    for (i, shade) in [30u8, 130, 230].iter().enumerate() {
        RgbaImage::from_pixel(20, 10, Rgba([*shade, *shade, *shade, 255]))
            .save(shots.join(format!("{}.png", i)))
            .unwrap();
    }

    let out = dir.path().join("out");
    let mut booth = Photobooth::new(StillImageCamera::new(shots), config(&out, TickMode::Manual)).unwrap();
    booth.set_exporter(Exporter::new(Arc::new(DirectoryDownload::new(out.clone()))));
    booth.open_camera().unwrap();

    booth.start_countdown(CountdownPlan::burst_with_interval(1)).unwrap();
    for _ in 0..3 {
        booth.tick();
    }
    assert!(booth.snapshot().is_complete());

    let strip = booth.composite(&CompositeConfig::default()).unwrap();
    let ExportOutcome::Downloaded { path, .. } = booth.export(&strip).unwrap() else {
        panic!("expected a download");
    };
    assert!(path.starts_with(&out));
    assert!(read_metadata(&path).is_err());
}

#[test]
fn missing_camera_directory_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut booth = Photobooth::new(
        StillImageCamera::new(dir.path().join("nope")),
        config(dir.path(), TickMode::Manual),
    )
    .unwrap();

    assert!(matches!(
        booth.open_camera(),
        Err(BoothError::CameraUnavailable(_))
    ));
    assert!(matches!(
        booth.capture_now(),
        Err(BoothError::FrameSourceUnavailable(_))
    ));
}
