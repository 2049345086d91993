//! The lossy compression pass over the working set.
//!
//! Copy-then-swap: `compress_working_set` builds a complete replacement set
//! and only the caller swaps it in, so a failed pass leaves the visible
//! working set exactly as it was.

pub mod codec;

pub use codec::{compress_image, CompressedImage};

use chrono::Utc;

use crate::error::PanelError;
use crate::models::{ImageItem, RecordImageGroup};

/// Per-image constraints handed to the codec.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOptions {
    pub max_size_bytes: u64,
    pub max_dimension: u32,
    /// Encoder quality in 0.0..=1.0, inverse of the user-facing intensity.
    pub quality: f32,
    /// When chasing the size target, only quality drops; resolution is
    /// fixed once the dimension cap has been applied.
    pub keep_resolution: bool,
}

impl CompressionOptions {
    /// Map the user-facing intensity (1..=100, higher = smaller output)
    /// onto codec constraints.
    pub fn for_intensity(intensity: u8) -> Self {
        let intensity = intensity.clamp(1, 100);
        Self {
            max_size_bytes: 2 * 1024 * 1024,
            max_dimension: 1024,
            quality: (100 - intensity) as f32 / 100.0,
            keep_resolution: true,
        }
    }
}

/// Compress every image in the working set, producing a new set with the
/// same record/field identities. Sequential per image; the first codec
/// failure aborts the whole pass.
pub fn compress_working_set(
    groups: Vec<RecordImageGroup>,
    intensity: u8,
) -> Result<Vec<RecordImageGroup>, PanelError> {
    let opts = CompressionOptions::for_intensity(intensity);

    groups
        .into_iter()
        .map(|group| compress_group(group, &opts))
        .collect()
}

fn compress_group(
    group: RecordImageGroup,
    opts: &CompressionOptions,
) -> Result<RecordImageGroup, PanelError> {
    let mut images = Vec::with_capacity(group.images.len());

    for item in group.images {
        let compressed = compress_image(&item.source.name, &item.bytes, opts)?;
        images.push(ImageItem {
            bytes: compressed.bytes,
            mime: compressed.mime,
            captured_at: Utc::now(),
            ..item
        });
    }

    Ok(RecordImageGroup { images, ..group })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_sixty_maps_to_expected_codec_constraints() {
        let opts = CompressionOptions::for_intensity(60);

        assert_eq!(opts.max_size_bytes, 2 * 1024 * 1024);
        assert_eq!(opts.max_dimension, 1024);
        assert!((opts.quality - 0.40).abs() < f32::EPSILON);
        assert!(opts.keep_resolution);
    }

    #[test]
    fn intensity_is_clamped_into_range() {
        assert!((CompressionOptions::for_intensity(0).quality - 0.99).abs() < f32::EPSILON);
        assert!(CompressionOptions::for_intensity(200).quality.abs() < f32::EPSILON);
    }
}
