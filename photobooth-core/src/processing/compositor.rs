use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::codec;
use super::layout::{Rect, StripLayout};
use super::text::{TextRenderer, CAPTION_FONT_SIZE, FOOTER_FONT_SIZE};
use crate::models::composite_result::CompositeResult;
use crate::models::config::{
    BoothConfiguration, CompositeConfig, FrameStyle, DEFAULT_FOOTER_LABEL, DEFAULT_JPEG_QUALITY,
    SESSION_FRAMES,
};
use crate::models::error::BoothError;
use crate::models::frame::{CapturedFrame, EncodedFormat};
use crate::storage::overlay::FileOverlay;
use crate::traits::overlay_source::OverlaySource;

pub const PLAIN_BACKGROUND: Rgba<u8> = Rgba([255, 192, 203, 255]);
pub const FRAMED_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const FRAMED_BAND: Rgba<u8> = Rgba([255, 240, 245, 255]);
pub const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Lays three captured frames out as a decorated vertical strip.
///
/// Data flow:
/// ```text
/// [frame 1] ─ decode ─┐
/// [frame 2] ─ decode ─┼→ join → draw photos → overlay (framed) → bands + text → encode
/// [frame 3] ─ decode ─┘                           ↑
/// [overlay] ─ load (own thread, bounded wait) ────┘
/// ```
pub struct StripCompositor {
    text: TextRenderer,
    overlay: Option<Arc<dyn OverlaySource>>,
    overlay_timeout: Duration,
    footer_label: String,
    jpeg_quality: u8,
}

impl StripCompositor {
    pub fn new(text: TextRenderer) -> Self {
        Self {
            text,
            overlay: None,
            overlay_timeout: Duration::from_secs(5),
            footer_label: DEFAULT_FOOTER_LABEL.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Build from booth configuration. `font_path` overrides the bundled font.
    pub fn from_config(config: &BoothConfiguration) -> Result<Self, BoothError> {
        let text = TextRenderer::from_optional_path(config.font_path.as_deref())?;

        let mut compositor = Self::new(text)
            .with_footer_label(config.footer_label.clone())
            .with_jpeg_quality(config.jpeg_quality);
        compositor.overlay_timeout = config.overlay_timeout;
        if let Some(path) = &config.overlay_path {
            compositor.overlay = Some(Arc::new(FileOverlay::new(path.clone())));
        }
        Ok(compositor)
    }

    pub fn with_overlay(mut self, overlay: Arc<dyn OverlaySource>, timeout: Duration) -> Self {
        self.overlay = Some(overlay);
        self.overlay_timeout = timeout;
        self
    }

    pub fn with_footer_label(mut self, label: impl Into<String>) -> Self {
        self.footer_label = label.into();
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Composite exactly three frames into one encoded strip.
    pub fn composite(
        &self,
        frames: &[CapturedFrame],
        config: &CompositeConfig,
    ) -> Result<CompositeResult, BoothError> {
        if frames.len() != SESSION_FRAMES {
            return Err(BoothError::IncompleteSession {
                captured: frames.len(),
                required: SESSION_FRAMES,
            });
        }

        // Start the overlay load first so it overlaps with frame decoding.
        let pending_overlay = match config.style {
            FrameStyle::Plain => None,
            FrameStyle::OverlayFramed => Some(self.spawn_overlay_load()?),
        };

        let photos = normalize_sizes(decode_all(frames)?);
        let (photo_width, photo_height) = photos[0].dimensions();
        let layout = StripLayout::for_style(config.style, photo_width, photo_height);

        let overlay = match pending_overlay {
            Some(rx) => Some(self.await_overlay(rx)?),
            None => None,
        };

        let footer_date = chrono::Local::now().format("%-m/%-d/%Y").to_string();
        let canvas = self.draw(&layout, &photos, overlay.as_ref(), config, &footer_date);

        let format = match config.style {
            FrameStyle::Plain => EncodedFormat::Jpeg,
            FrameStyle::OverlayFramed => EncodedFormat::Png,
        };
        let bytes = codec::encode(&canvas, format, self.jpeg_quality)?;

        log::info!(
            "composited {:?} strip {}x{} ({} bytes)",
            config.style,
            canvas.width(),
            canvas.height(),
            bytes.len()
        );

        Ok(CompositeResult {
            bytes,
            format,
            width: canvas.width(),
            height: canvas.height(),
            style: config.style,
            caption: config.caption.clone(),
        })
    }

    fn draw(
        &self,
        layout: &StripLayout,
        photos: &[RgbaImage],
        overlay: Option<&RgbaImage>,
        config: &CompositeConfig,
        footer_date: &str,
    ) -> RgbaImage {
        let background = match config.style {
            FrameStyle::Plain => PLAIN_BACKGROUND,
            FrameStyle::OverlayFramed => FRAMED_BACKGROUND,
        };
        let mut canvas = RgbaImage::from_pixel(layout.width(), layout.height(), background);

        for (i, photo) in photos.iter().enumerate() {
            let rect = layout.photo_rect(i);
            imageops::replace(&mut canvas, photo, rect.x as i64, rect.y as i64);
        }

        if let Some(overlay) = overlay {
            let scaled = imageops::resize(overlay, layout.width(), layout.height(), FilterType::Triangle);
            imageops::overlay(&mut canvas, &scaled, 0, 0);
            fill_rect(&mut canvas, layout.caption_band(), FRAMED_BAND);
            fill_rect(&mut canvas, layout.footer_band(), FRAMED_BAND);
        }

        self.text.draw_centered(
            &mut canvas,
            layout.caption_band(),
            &config.caption,
            CAPTION_FONT_SIZE,
            TEXT_COLOR,
        );

        let footer = layout.footer_band();
        let half = footer.height / 2;
        let label_line = Rect { height: half, ..footer };
        let date_line = Rect {
            y: footer.y + half,
            height: footer.height - half,
            ..footer
        };
        self.text
            .draw_centered(&mut canvas, label_line, &self.footer_label, FOOTER_FONT_SIZE, TEXT_COLOR);
        self.text
            .draw_centered(&mut canvas, date_line, footer_date, FOOTER_FONT_SIZE, TEXT_COLOR);

        canvas
    }

    fn spawn_overlay_load(&self) -> Result<mpsc::Receiver<Result<RgbaImage, BoothError>>, BoothError> {
        let source = self
            .overlay
            .clone()
            .ok_or_else(|| BoothError::OverlayLoadFailed("no overlay configured".into()))?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("overlay-load".into())
            .spawn(move || {
                // The receiver may have timed out and gone away.
                let _ = tx.send(source.load());
            })
            .map_err(|e| BoothError::OverlayLoadFailed(format!("failed to spawn loader: {}", e)))?;
        Ok(rx)
    }

    fn await_overlay(&self, rx: mpsc::Receiver<Result<RgbaImage, BoothError>>) -> Result<RgbaImage, BoothError> {
        let describe = || {
            self.overlay
                .as_ref()
                .map(|o| o.describe())
                .unwrap_or_else(|| "overlay".into())
        };

        match rx.recv_timeout(self.overlay_timeout) {
            Ok(Ok(image)) if image.width() > 0 && image.height() > 0 => Ok(image),
            Ok(Ok(_)) => Err(BoothError::OverlayLoadFailed(format!("{} is empty", describe()))),
            Ok(Err(BoothError::OverlayLoadFailed(msg))) => Err(BoothError::OverlayLoadFailed(msg)),
            Ok(Err(e)) => Err(BoothError::OverlayLoadFailed(format!("{}: {}", describe(), e))),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("overlay {} still loading after {:?}", describe(), self.overlay_timeout);
                Err(BoothError::OverlayLoadFailed(format!(
                    "{} did not load within {:?}",
                    describe(),
                    self.overlay_timeout
                )))
            }
            Err(RecvTimeoutError::Disconnected) => Err(BoothError::OverlayLoadFailed(format!(
                "{} loader exited without a result",
                describe()
            ))),
        }
    }
}

/// Decode every frame on its own scoped thread and join them.
fn decode_all(frames: &[CapturedFrame]) -> Result<Vec<RgbaImage>, BoothError> {
    thread::scope(|scope| {
        let handles: Vec<_> = frames
            .iter()
            .map(|frame| scope.spawn(move || codec::decode(&frame.bytes)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(BoothError::EncodingFailed("frame decoder panicked".into())))
            })
            .collect()
    })
}

/// Bring every photo to the size of the first one.
fn normalize_sizes(mut photos: Vec<RgbaImage>) -> Vec<RgbaImage> {
    let target = photos[0].dimensions();
    for photo in photos.iter_mut().skip(1) {
        if photo.dimensions() != target {
            log::debug!("resizing {:?} frame to {:?}", photo.dimensions(), target);
            *photo = imageops::resize(photo, target.0, target.1, FilterType::Triangle);
        }
    }
    photos
}

fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let right = (rect.x + rect.width).min(canvas.width());
    let bottom = (rect.y + rect.height).min(canvas.height());
    for y in rect.y..bottom {
        for x in rect.x..right {
            canvas.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::overlay::MemoryOverlay;
    use chrono::Utc;

    const RED: Rgba<u8> = Rgba([230, 20, 20, 255]);
    const GREEN: Rgba<u8> = Rgba([20, 200, 20, 255]);
    const BLUE: Rgba<u8> = Rgba([20, 20, 230, 255]);

    fn frame(width: u32, height: u32, color: Rgba<u8>) -> CapturedFrame {
        let image = RgbaImage::from_pixel(width, height, color);
        CapturedFrame {
            bytes: codec::encode_jpeg(&image, 95).unwrap(),
            format: EncodedFormat::Jpeg,
            width,
            height,
            captured_at: Utc::now(),
        }
    }

    fn session(width: u32, height: u32) -> Vec<CapturedFrame> {
        vec![
            frame(width, height, RED),
            frame(width, height, GREEN),
            frame(width, height, BLUE),
        ]
    }

    fn close(a: &Rgba<u8>, b: &Rgba<u8>) -> bool {
        (0..3).all(|c| (a[c] as i32 - b[c] as i32).abs() <= 24)
    }

    /// Never finishes loading within any reasonable timeout.
    struct StalledOverlay;

    impl OverlaySource for StalledOverlay {
        fn load(&self) -> Result<RgbaImage, BoothError> {
            thread::sleep(Duration::from_secs(2));
            Ok(RgbaImage::new(1, 1))
        }

        fn describe(&self) -> String {
            "stalled overlay".into()
        }
    }

    #[test]
    fn fewer_than_three_frames_is_incomplete() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        for count in 0..3 {
            let frames = &session(8, 8)[..count];
            let err = compositor
                .composite(frames, &CompositeConfig::default())
                .unwrap_err();
            assert_eq!(
                err,
                BoothError::IncompleteSession {
                    captured: count,
                    required: 3
                }
            );
        }
    }

    #[test]
    fn plain_strip_dimensions_and_layout() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let result = compositor
            .composite(&session(400, 300), &CompositeConfig::new("Hi", FrameStyle::Plain))
            .unwrap();

        assert_eq!(result.format, EncodedFormat::Jpeg);
        assert_eq!((result.width, result.height), (460, 1130));

        let strip = codec::decode(&result.bytes).unwrap();
        assert_eq!(strip.dimensions(), (460, 1130));
        assert!(close(strip.get_pixel(5, 5), &PLAIN_BACKGROUND));
        assert!(close(strip.get_pixel(230, 40 + 150), &RED));
        assert!(close(strip.get_pixel(230, 360 + 150), &GREEN));
        assert!(close(strip.get_pixel(230, 680 + 150), &BLUE));
    }

    #[test]
    fn empty_caption_keeps_dimensions() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let frames = session(64, 48);
        let empty = compositor
            .composite(&frames, &CompositeConfig::new("", FrameStyle::Plain))
            .unwrap();
        let captioned = compositor
            .composite(&frames, &CompositeConfig::new("Best day ever", FrameStyle::Plain))
            .unwrap();

        assert_eq!((empty.width, empty.height), (captioned.width, captioned.height));
        assert_eq!(empty.caption, "");
    }

    #[test]
    fn mismatched_frames_are_resized() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let frames = vec![frame(40, 30, RED), frame(80, 60, GREEN), frame(20, 15, BLUE)];
        let result = compositor.composite(&frames, &CompositeConfig::default()).unwrap();
        let layout = StripLayout::for_style(FrameStyle::Plain, 40, 30);
        assert_eq!((result.width, result.height), (layout.width(), layout.height()));
    }

    #[test]
    fn overlay_is_drawn_above_photos() {
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 215, 0, 255]));
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap())
            .with_overlay(Arc::new(MemoryOverlay::new(overlay)), Duration::from_secs(5));

        let result = compositor
            .composite(&session(40, 30), &CompositeConfig::new("", FrameStyle::OverlayFramed))
            .unwrap();
        assert_eq!(result.format, EncodedFormat::Png);

        let strip = codec::decode(&result.bytes).unwrap();
        let layout = StripLayout::for_style(FrameStyle::OverlayFramed, 40, 30);
        for i in 0..3 {
            let rect = layout.photo_rect(i);
            let centre = strip.get_pixel(rect.x + rect.width / 2, rect.y + rect.height / 2);
            assert!(close(centre, &Rgba([255, 215, 0, 255])), "photo {} not covered: {:?}", i, centre);
        }

        // Caption and footer bands sit above the overlay.
        let caption = layout.caption_band();
        assert_eq!(*strip.get_pixel(1, caption.y + 1), FRAMED_BAND);
        let footer = layout.footer_band();
        assert_eq!(*strip.get_pixel(1, footer.y + footer.height - 1), FRAMED_BAND);
    }

    #[test]
    fn transparent_overlay_leaves_photos_visible() {
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap())
            .with_overlay(Arc::new(MemoryOverlay::new(overlay)), Duration::from_secs(5));

        let result = compositor
            .composite(&session(40, 30), &CompositeConfig::new("x", FrameStyle::OverlayFramed))
            .unwrap();
        let strip = codec::decode(&result.bytes).unwrap();
        let layout = StripLayout::for_style(FrameStyle::OverlayFramed, 40, 30);
        let rect = layout.photo_rect(1);
        assert!(close(strip.get_pixel(rect.x + 20, rect.y + 15), &GREEN));
        assert_eq!(*strip.get_pixel(0, 0), FRAMED_BACKGROUND);
    }

    #[test]
    fn framed_without_overlay_fails() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let err = compositor
            .composite(&session(8, 8), &CompositeConfig::new("", FrameStyle::OverlayFramed))
            .unwrap_err();
        assert!(matches!(err, BoothError::OverlayLoadFailed(_)));
    }

    #[test]
    fn stalled_overlay_times_out() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap())
            .with_overlay(Arc::new(StalledOverlay), Duration::from_millis(50));
        let err = compositor
            .composite(&session(8, 8), &CompositeConfig::new("", FrameStyle::OverlayFramed))
            .unwrap_err();
        match err {
            BoothError::OverlayLoadFailed(msg) => assert!(msg.contains("did not load"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_overlay_file_fails() {
        let config = BoothConfiguration {
            overlay_path: Some("/nonexistent/frame-overlay.png".into()),
            ..Default::default()
        };
        let compositor = StripCompositor::from_config(&config).unwrap();
        let err = compositor
            .composite(&session(8, 8), &CompositeConfig::new("", FrameStyle::OverlayFramed))
            .unwrap_err();
        assert!(matches!(err, BoothError::OverlayLoadFailed(_)));
    }

    /// Near-black pixels inside `rect`, ignoring a few rows at each edge.
    fn text_pixels(strip: &RgbaImage, rect: Rect) -> usize {
        let inset = 4;
        let mut count = 0;
        for y in rect.y + inset..rect.y + rect.height - inset {
            for x in rect.x..rect.x + rect.width {
                let p = strip.get_pixel(x, y);
                if p[0] < 96 && p[1] < 96 && p[2] < 96 {
                    count += 1;
                }
            }
        }
        count
    }

    fn footer_halves(layout: &StripLayout) -> (Rect, Rect) {
        let footer = layout.footer_band();
        let half = footer.height / 2;
        (
            Rect { height: half, ..footer },
            Rect { y: footer.y + half, height: footer.height - half, ..footer },
        )
    }

    #[test]
    fn default_configuration_draws_caption_and_footer() {
        let compositor = StripCompositor::from_config(&BoothConfiguration::default()).unwrap();
        let result = compositor
            .composite(&session(400, 300), &CompositeConfig::new("Best day ever", FrameStyle::Plain))
            .unwrap();
        let strip = codec::decode(&result.bytes).unwrap();
        let layout = StripLayout::for_style(FrameStyle::Plain, 400, 300);

        assert!(text_pixels(&strip, layout.caption_band()) > 50);
        let (label, date) = footer_halves(&layout);
        assert!(text_pixels(&strip, label) > 20, "footer label missing");
        assert!(text_pixels(&strip, date) > 20, "footer date missing");
    }

    #[test]
    fn empty_caption_leaves_caption_band_blank() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let result = compositor
            .composite(&session(400, 300), &CompositeConfig::new("", FrameStyle::Plain))
            .unwrap();
        let strip = codec::decode(&result.bytes).unwrap();
        let layout = StripLayout::for_style(FrameStyle::Plain, 400, 300);

        assert_eq!(text_pixels(&strip, layout.caption_band()), 0);
        let (label, date) = footer_halves(&layout);
        assert!(text_pixels(&strip, label) > 20);
        assert!(text_pixels(&strip, date) > 20);
    }

    #[test]
    fn framed_strip_draws_text_over_bands() {
        let overlay = RgbaImage::from_pixel(4, 4, Rgba([255, 215, 0, 255]));
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap())
            .with_overlay(Arc::new(MemoryOverlay::new(overlay)), Duration::from_secs(5));
        let result = compositor
            .composite(&session(400, 300), &CompositeConfig::new("Party", FrameStyle::OverlayFramed))
            .unwrap();
        let strip = codec::decode(&result.bytes).unwrap();
        let layout = StripLayout::for_style(FrameStyle::OverlayFramed, 400, 300);

        assert!(text_pixels(&strip, layout.caption_band()) > 20);
        let (label, date) = footer_halves(&layout);
        assert!(text_pixels(&strip, label) > 20);
        assert!(text_pixels(&strip, date) > 20);
    }

    #[test]
    fn corrupt_frame_fails_to_decode() {
        let compositor = StripCompositor::new(TextRenderer::bundled().unwrap());
        let mut frames = session(8, 8);
        frames[1].bytes = vec![0xFF, 0xD8, 0x00];
        let err = compositor.composite(&frames, &CompositeConfig::default()).unwrap_err();
        assert!(matches!(err, BoothError::EncodingFailed(_)));
    }
}
