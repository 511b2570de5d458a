//! Still image encoding and decoding.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::models::error::BoothError;
use crate::models::frame::EncodedFormat;

/// Encode as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, BoothError> {
    let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BoothError::EncodingFailed(format!("jpeg encoding failed: {}", e)))?;
    Ok(bytes)
}

/// Encode as RGBA PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BoothError> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .map_err(|e| BoothError::EncodingFailed(format!("png encoding failed: {}", e)))?;
    Ok(bytes)
}

pub fn encode(image: &RgbaImage, format: EncodedFormat, jpeg_quality: u8) -> Result<Vec<u8>, BoothError> {
    match format {
        EncodedFormat::Jpeg => encode_jpeg(image, jpeg_quality),
        EncodedFormat::Png => encode_png(image),
    }
}

/// Decode any supported still into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, BoothError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| BoothError::EncodingFailed(format!("decode failed: {}", e)))
}
