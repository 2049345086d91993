use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::PanelError;

use super::CompressionOptions;

// Quality never drops below this while chasing the size target; resolution
// is never reduced further once the dimension cap has been applied.
const MIN_JPEG_QUALITY: u8 = 10;
const JPEG_QUALITY_STEP: u8 = 10;

/// Output of one codec invocation: new bytes plus the mime they encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Run the lossy transform on one image.
///
/// Decodes, downscales to `max_dimension` on the longer side only when the
/// source is larger (never upscales), then re-encodes. PNG stays PNG after
/// the resize; every other format is encoded as JPEG at the requested
/// quality, stepping quality down until the result fits `max_size_bytes`
/// or the quality floor is reached.
pub fn compress_image(
    name: &str,
    bytes: &[u8],
    opts: &CompressionOptions,
) -> Result<CompressedImage, PanelError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| PanelError::Codec {
            name: name.to_string(),
            source: image::ImageError::IoError(err),
        })?;
    let format = reader.format();

    let decoded = reader.decode().map_err(|err| PanelError::Codec {
        name: name.to_string(),
        source: err,
    })?;

    let resized = downscale(decoded, opts.max_dimension);

    match format {
        Some(ImageFormat::Png) => encode_png(name, &resized),
        _ => encode_jpeg(name, &resized, opts),
    }
}

/// Shrink so the longer side fits `max_dimension`; smaller images pass
/// through untouched.
fn downscale(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    if img.width().max(img.height()) > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
    } else {
        img
    }
}

fn encode_png(name: &str, img: &DynamicImage) -> Result<CompressedImage, PanelError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|err| PanelError::Codec {
            name: name.to_string(),
            source: err,
        })?;

    Ok(CompressedImage {
        bytes: buf.into_inner(),
        mime: "image/png".to_string(),
    })
}

fn encode_jpeg(
    name: &str,
    img: &DynamicImage,
    opts: &CompressionOptions,
) -> Result<CompressedImage, PanelError> {
    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();

    let mut quality = (opts.quality * 100.0).clamp(MIN_JPEG_QUALITY as f32, 100.0) as u8;

    loop {
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| PanelError::Codec {
                name: name.to_string(),
                source: err,
            })?;

        let bytes = buf.into_inner();
        if bytes.len() as u64 <= opts.max_size_bytes || quality <= MIN_JPEG_QUALITY {
            return Ok(CompressedImage {
                bytes,
                mime: "image/jpeg".to_string(),
            });
        }

        quality = quality.saturating_sub(JPEG_QUALITY_STEP).max(MIN_JPEG_QUALITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, 0, (y % 256) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn decoded_dimensions(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(bytes).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn oversized_images_shrink_to_the_dimension_cap() {
        let source = sample_jpeg(2048, 1024);
        let opts = CompressionOptions::for_intensity(60);

        let out = compress_image("big.jpg", &source, &opts).unwrap();

        let (w, h) = decoded_dimensions(&out.bytes);
        assert_eq!(w.max(h), 1024);
        assert_eq!(out.mime, "image/jpeg");
    }

    #[test]
    fn small_images_are_never_upscaled() {
        let source = sample_jpeg(64, 48);
        let opts = CompressionOptions::for_intensity(10);

        let out = compress_image("small.jpg", &source, &opts).unwrap();

        assert_eq!(decoded_dimensions(&out.bytes), (64, 48));
    }

    #[test]
    fn png_input_stays_png() {
        let source = sample_png(1600, 900);
        let opts = CompressionOptions::for_intensity(50);

        let out = compress_image("shot.png", &source, &opts).unwrap();

        assert_eq!(out.mime, "image/png");
        let (w, h) = decoded_dimensions(&out.bytes);
        assert_eq!(w.max(h), 1024);
    }

    #[test]
    fn undecodable_bytes_fail_with_a_codec_error() {
        let opts = CompressionOptions::for_intensity(10);
        let err = compress_image("junk.jpg", b"not an image at all", &opts).unwrap_err();
        assert!(matches!(err, PanelError::Codec { .. }));
    }
}
