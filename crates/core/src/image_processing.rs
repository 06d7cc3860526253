//! Image compression and encoding for transport.
//!
//! Photos straight off a phone are far larger than the vision model needs.
//! Before upload they are decoded, scaled so the longer side fits within
//! [`CompressionOptions::max_dimension`], re-encoded as JPEG and wrapped in
//! Base64.
//!
//! # Example
//!
//! ```ignore
//! use outfit_lens_core::image_processing::ImageCompressor;
//!
//! let bytes = std::fs::read("outfit.png")?;
//! let payload = ImageCompressor::default().compress(&bytes).await?;
//! println!("{}x{}, {} base64 chars", payload.width, payload.height, payload.data.len());
//! ```

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

/// Content type of every payload produced by [`ImageCompressor`].
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Parameters controlling how aggressively images are shrunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompressionOptions {
    /// Upper bound for the longer side, in pixels.
    pub max_dimension: u32,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_dimension: 800,
            quality: 60,
        }
    }
}

/// A compressed image ready to be embedded in a JSON request body.
///
/// `data` is the bare Base64 body; it never carries a `data:` URI prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EncodedPayload {
    #[serde(rename = "base64Data")]
    pub data: String,
    #[serde(rename = "fileType")]
    pub content_type: &'static str,
    #[serde(skip)]
    pub width: u32,
    #[serde(skip)]
    pub height: u32,
}

impl EncodedPayload {
    /// Wraps an already encoded JPEG body.
    pub fn jpeg(data: String, width: u32, height: u32) -> Self {
        Self {
            data,
            content_type: JPEG_CONTENT_TYPE,
            width,
            height,
        }
    }

    /// Renders the payload as a `data:` URI, e.g. for previews.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.data)
    }
}

/// Computes the output size for an image, preserving aspect ratio.
///
/// The dominant axis is clamped to `max_dimension`; when width and height
/// are equal, width counts as dominant. Images that already fit are
/// returned unchanged, never upscaled.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let scale = |side: u32, dominant: u32| -> u32 {
        let scaled = (side as f64 * max_dimension as f64 / dominant as f64).round() as u32;
        scaled.max(1)
    };

    if width >= height {
        if width > max_dimension {
            (max_dimension, scale(height, width))
        } else {
            (width, height)
        }
    } else if height > max_dimension {
        (scale(width, height), max_dimension)
    } else {
        (width, height)
    }
}

/// Downscales and re-encodes images for upload.
#[derive(Clone, Debug, Default)]
pub struct ImageCompressor {
    options: CompressionOptions,
}

impl ImageCompressor {
    pub fn new(options: CompressionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompressionOptions {
        self.options
    }

    /// Compresses an image without blocking the async runtime.
    ///
    /// Decoding, resampling and encoding run on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Decode`] if the bytes are not a supported image and
    /// [`AppError::Encode`] if JPEG encoding fails.
    pub async fn compress(&self, image: &[u8]) -> Result<EncodedPayload> {
        let options = self.options;
        let bytes = image.to_vec();

        tokio::task::spawn_blocking(move || Self::new(options).compress_blocking(&bytes))
            .await
            .map_err(|e| AppError::encode(format!("Compression task failed: {}", e)))?
    }

    /// Decodes an image and rotates/flips it as its EXIF orientation says,
    /// so phone photos come out the way they are displayed.
    fn decode_upright(image: &[u8]) -> Result<DynamicImage> {
        let decode_err =
            |e: image::ImageError| AppError::decode(format!("Failed to decode image: {}", e));

        let mut decoder = ImageReader::new(Cursor::new(image))
            .with_guessed_format()
            .map_err(|e| AppError::decode(format!("Failed to read image: {}", e)))?
            .into_decoder()
            .map_err(decode_err)?;
        let orientation = decoder.orientation().map_err(decode_err)?;

        let mut decoded = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
        decoded.apply_orientation(orientation);
        Ok(decoded)
    }

    /// Synchronous variant of [`compress`](Self::compress).
    pub fn compress_blocking(&self, image: &[u8]) -> Result<EncodedPayload> {
        let decoded = Self::decode_upright(image)?;

        let (width, height) = (decoded.width(), decoded.height());
        let (target_width, target_height) =
            target_dimensions(width, height, self.options.max_dimension);

        let resized = if (target_width, target_height) == (width, height) {
            decoded
        } else {
            decoded.resize_exact(target_width, target_height, FilterType::Triangle)
        };

        // JPEG has no alpha channel.
        let rgb = resized.to_rgb8();

        let mut buffer: Vec<u8> = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.options.quality)
            .encode_image(&rgb)
            .map_err(|e| AppError::encode(format!("Failed to encode image: {}", e)))?;

        debug!(
            "Compressed {}x{} image to {}x{} ({} bytes JPEG)",
            width,
            height,
            target_width,
            target_height,
            buffer.len()
        );

        Ok(EncodedPayload::jpeg(
            BASE64.encode(&buffer),
            target_width,
            target_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([200, 80, 40, 255]),
        ));
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn decode_payload(payload: &EncodedPayload) -> DynamicImage {
        let bytes = BASE64.decode(&payload.data).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn landscape_wider_than_max_is_clamped() {
        for (w, h) in [(1600, 900), (801, 1), (4000, 3000), (1000, 999), (2000, 2000)] {
            let (tw, th) = target_dimensions(w, h, 800);
            let expected = (h as f64 * 800.0 / w as f64).round() as i64;
            assert_eq!(tw, 800, "{}x{}", w, h);
            assert!((th as i64 - expected).abs() <= 1, "{}x{} -> {}", w, h, th);
        }
    }

    #[test]
    fn portrait_taller_than_max_is_clamped() {
        assert_eq!(target_dimensions(900, 1600, 800), (450, 800));
        assert_eq!(target_dimensions(3, 3000, 800), (1, 800));
    }

    #[test]
    fn small_images_are_not_upscaled() {
        for (w, h) in [(1, 1), (800, 800), (640, 480), (300, 799)] {
            assert_eq!(target_dimensions(w, h, 800), (w, h));
        }
    }

    #[test]
    fn extreme_aspect_ratio_keeps_at_least_one_pixel() {
        assert_eq!(target_dimensions(10_000, 1, 800), (800, 1));
    }

    #[test]
    fn compress_shrinks_large_images() {
        let payload = ImageCompressor::default()
            .compress_blocking(&png_bytes(1200, 600))
            .unwrap();

        assert_eq!((payload.width, payload.height), (800, 400));
        assert_eq!(payload.content_type, JPEG_CONTENT_TYPE);

        let decoded = decode_payload(&payload);
        assert_eq!((decoded.width(), decoded.height()), (800, 400));
    }

    #[test]
    fn compress_keeps_small_images_at_original_size() {
        let payload = ImageCompressor::default()
            .compress_blocking(&png_bytes(320, 240))
            .unwrap();

        let decoded = decode_payload(&payload);
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }

    #[test]
    fn payload_has_no_data_url_prefix() {
        let payload = ImageCompressor::default()
            .compress_blocking(&png_bytes(64, 64))
            .unwrap();

        assert!(!payload.data.starts_with("data:"));
        assert!(!payload.data.contains(','));
        assert!(payload.data_url().starts_with("data:image/jpeg;base64,"));
    }

    /// A JPEG whose EXIF block says "rotate 90° clockwise" (orientation 6).
    fn jpeg_with_orientation_6(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, 90)
            .encode_image(&image)
            .unwrap();

        // Big-endian TIFF with a single IFD entry: Orientation (0x0112), SHORT, 6.
        let mut exif = b"Exif\0\0".to_vec();
        exif.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
        exif.extend_from_slice(&[0x00, 0x01]);
        exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        exif.extend_from_slice(&[0x00, 0x06, 0x00, 0x00]);
        exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let segment_len = (exif.len() + 2) as u16;
        let mut app1 = vec![0xFF, 0xE1];
        app1.extend_from_slice(&segment_len.to_be_bytes());
        app1.extend_from_slice(&exif);

        // Right after SOI.
        jpeg.splice(2..2, app1);
        jpeg
    }

    #[test]
    fn exif_rotated_photo_is_compressed_upright() {
        let payload = ImageCompressor::default()
            .compress_blocking(&jpeg_with_orientation_6(1200, 600))
            .unwrap();

        assert_eq!((payload.width, payload.height), (400, 800));
        let decoded = decode_payload(&payload);
        assert_eq!((decoded.width(), decoded.height()), (400, 800));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageCompressor::default()
            .compress_blocking(b"definitely not an image")
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn async_compress_matches_blocking() {
        let bytes = png_bytes(1000, 1500);
        let compressor = ImageCompressor::default();

        let payload = compressor.compress(&bytes).await.unwrap();
        assert_eq!((payload.width, payload.height), (533, 800));
        assert_eq!(payload, compressor.compress_blocking(&bytes).unwrap());
    }
}
