//! Horizontal mirroring.
//!
//! Front-facing cameras deliver a mirror image; captures are flipped back so
//! text and faces read correctly to the subject.

use image::{imageops, RgbaImage};

/// Flip an image across its vertical centre line.
///
/// Equivalent to translating by the surface width and scaling x by -1
/// before drawing: pixel `x` lands at `width - 1 - x`.
pub fn mirror_horizontal(image: &RgbaImage) -> RgbaImage {
    imageops::flip_horizontal(image)
}

/// Flip in place, used for the live preview where the buffer is owned.
pub fn mirror_horizontal_in_place(image: &mut RgbaImage) {
    imageops::flip_horizontal_in_place(image);
}
