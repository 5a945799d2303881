use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use crate::error::ValidationError;

/// Quality used when a picked cover is re-encoded for storage.
pub const COVER_JPEG_QUALITY: u8 = 70;

/// Decodes an image the user picked and re-encodes it as JPEG.
pub fn normalize_cover(bytes: &[u8]) -> Result<Vec<u8>, ValidationError> {
    let img = image::load_from_memory(bytes).map_err(|err| {
        log::warn!("cover decode failed ({} bytes): {}", bytes.len(), err);
        ValidationError::UnreadableCover
    })?;
    encode_jpeg(&img).map_err(|err| {
        log::warn!("cover encode failed: {}", err);
        ValidationError::UnreadableCover
    })
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg_bytes, COVER_JPEG_QUALITY);
    rgb.write_with_encoder(encoder)?;
    log::debug!(
        "cover encoded as jpeg {}x{} ({} bytes)",
        rgb.width(),
        rgb.height(),
        jpeg_bytes.len()
    );
    Ok(jpeg_bytes)
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    use image::codecs::png::PngEncoder;
    use image::{ImageBuffer, Rgba};

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(width, height, Rgba([250u8, 245, 235, 255]));
    let mut png_bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_with_encoder(PngEncoder::new(&mut png_bytes))
        .expect("png encode");
    png_bytes
}
