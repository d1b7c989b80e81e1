//! JPEG re-encoding shared by the inline path and the worker.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

pub const JPEG_MIME: &str = "image/jpeg";

/// Quality used by the worker when a request carries none.
pub const DEFAULT_WORKER_QUALITY: f32 = 0.8;

pub(crate) const INVALID_DATA: &str = "Invalid data received";

/// Re-encode a tightly packed RGBA8 buffer as JPEG.
///
/// JPEG has no alpha channel: each pixel is composited over black, the way
/// a transparent canvas is flattened on export.
pub fn encode_rgba(image_data: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, String> {
    if image_data.is_empty() || width == 0 || height == 0 {
        return Err(INVALID_DATA.to_string());
    }

    let expected = width as usize * height as usize * 4;
    if image_data.len() != expected {
        return Err(format!(
            "image data is {} bytes, expected {} for {}x{} RGBA",
            image_data.len(),
            expected,
            width,
            height
        ));
    }

    let rgb: Vec<u8> = image_data
        .chunks_exact(4)
        .flat_map(|px| {
            let alpha = px[3] as u16;
            [
                (px[0] as u16 * alpha / 255) as u8,
                (px[1] as u16 * alpha / 255) as u8,
                (px[2] as u16 * alpha / 255) as u8,
            ]
        })
        .collect();

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| e.to_string())?;
    Ok(buf)
}

/// Map a 0.0..=1.0 quality onto the JPEG 1..=100 scale.
///
/// Zero, negative or NaN means "not given" and falls back to
/// `DEFAULT_WORKER_QUALITY`.
pub fn jpeg_quality(quality: f32) -> u8 {
    let quality = if quality.is_nan() || quality <= 0.0 {
        DEFAULT_WORKER_QUALITY
    } else {
        quality.min(1.0)
    };
    ((quality * 100.0).round() as u8).clamp(1, 100)
}
