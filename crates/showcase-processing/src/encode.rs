//! Lossy re-encoding of transformed images.

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use showcase_core::SlotError;
use std::io::Cursor;

pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Encode to JPEG at the given quality. Alpha is flattened to RGB since JPEG
/// has no alpha channel.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, SlotError> {
    let rgb = img.to_rgb8();

    let estimated = (rgb.width() * rgb.height() / 4) as usize;
    let mut buffer = Vec::with_capacity(estimated.max(1024));
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);

    rgb.write_with_encoder(encoder)
        .map_err(|e| SlotError::Decode(format!("JPEG encode failed: {}", e)))?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageReader, Rgb, RgbImage};

    #[test]
    fn encoded_output_is_decodable_jpeg() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 48, Rgb([200, 40, 40])));
        let encoded = encode_jpeg(&img, 80).unwrap();

        let decoded = ImageReader::new(Cursor::new(&encoded))
            .with_guessed_format()
            .unwrap();
        assert_eq!(decoded.format(), Some(image::ImageFormat::Jpeg));
        assert_eq!(decoded.decode().unwrap().dimensions(), (64, 48));
    }

    #[test]
    fn rgba_input_is_flattened() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            8,
            8,
            image::Rgba([10, 20, 30, 128]),
        ));
        assert!(encode_jpeg(&img, 85).is_ok());
    }
}
