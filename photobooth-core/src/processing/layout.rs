//! Strip geometry.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ header                       │
//! │   ┌──────────────────────┐   │ ← photo 1 at header
//! │   └──────────────────────┘   │
//! │ spacing                      │
//! │   ┌──────────────────────┐   │ ← photo 2 at header + (H + spacing)
//! │   └──────────────────────┘   │
//! │   ┌──────────────────────┐   │ ← photo 3 at header + 2 (H + spacing)
//! │   └──────────────────────┘   │
//! │ border                       │
//! │ caption band (50)            │
//! │ footer band (80)             │
//! │ border                       │
//! └──────────────────────────────┘
//!   width = W + 6 * border
//! ```

use crate::models::config::{FrameStyle, SESSION_FRAMES};

pub const BORDER_WIDTH: u32 = 10;
pub const CAPTION_HEIGHT: u32 = 50;
pub const FOOTER_HEIGHT: u32 = 80;

const PLAIN_HEADER_HEIGHT: u32 = 40;
const PLAIN_SPACING: u32 = 20;
const FRAMED_HEADER_HEIGHT: u32 = 30;
const FRAMED_SPACING: u32 = 10;

/// An axis-aligned rectangle on the strip surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Fixed layout of a three-photo strip for one style and photo size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripLayout {
    pub photo_width: u32,
    pub photo_height: u32,
    pub header_height: u32,
    pub spacing: u32,
    pub border: u32,
}

impl StripLayout {
    pub fn for_style(style: FrameStyle, photo_width: u32, photo_height: u32) -> Self {
        let (header_height, spacing) = match style {
            FrameStyle::Plain => (PLAIN_HEADER_HEIGHT, PLAIN_SPACING),
            FrameStyle::OverlayFramed => (FRAMED_HEADER_HEIGHT, FRAMED_SPACING),
        };
        Self {
            photo_width,
            photo_height,
            header_height,
            spacing,
            border: BORDER_WIDTH,
        }
    }

    pub fn width(&self) -> u32 {
        self.photo_width + 6 * self.border
    }

    pub fn height(&self) -> u32 {
        let frames = SESSION_FRAMES as u32;
        self.header_height
            + CAPTION_HEIGHT
            + frames * self.photo_height
            + (frames - 1) * self.spacing
            + FOOTER_HEIGHT
            + 2 * self.border
    }

    /// Where photo `index` (0-based) is drawn; horizontally centred.
    pub fn photo_rect(&self, index: usize) -> Rect {
        Rect {
            x: (self.width() - self.photo_width) / 2,
            y: self.header_height + index as u32 * (self.photo_height + self.spacing),
            width: self.photo_width,
            height: self.photo_height,
        }
    }

    pub fn caption_band(&self) -> Rect {
        let photos_bottom = self.photo_rect(SESSION_FRAMES - 1).y + self.photo_height;
        Rect {
            x: 0,
            y: photos_bottom + self.border,
            width: self.width(),
            height: CAPTION_HEIGHT,
        }
    }

    pub fn footer_band(&self) -> Rect {
        let caption = self.caption_band();
        Rect {
            x: 0,
            y: caption.y + caption.height,
            width: self.width(),
            height: FOOTER_HEIGHT,
        }
    }
}
