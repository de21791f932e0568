use anyhow::{Context, Result, bail};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, RgbaImage};
use std::fs;
use std::path::Path;

use crate::constants::favicon::MAX_FRAME_SIZE;

/// Split the requested frame sizes into the ones a `side`x`side` source can
/// provide and the ones that would need upscaling
pub fn select_frame_sizes(side: u32, requested: &[u32]) -> (Vec<u32>, Vec<u32>) {
    requested.iter().copied().partition(|&size| size <= side)
}

/// Bundle `source_png` into a multi-resolution ICO at `ico_path`.
///
/// Every frame is resampled from the one source bitmap (Lanczos3), so frames
/// the source was not rendered at are interpolated. Sizes larger than the
/// source are skipped. The source must be square. Returns the frame sizes
/// actually written.
pub fn write_favicon(source_png: &Path, ico_path: &Path, sizes: &[u32]) -> Result<Vec<u32>> {
    let source = image::open(source_png)
        .with_context(|| format!("Failed to open {}", source_png.display()))?
        .to_rgba8();

    let (width, height) = source.dimensions();
    if width != height {
        bail!(
            "{} is {}x{}; favicon frames need a square source",
            source_png.display(),
            width,
            height
        );
    }

    let (frame_sizes, skipped) = select_frame_sizes(width, sizes);
    for size in &skipped {
        eprintln!(
            "⚠️  Skipping {}x{} favicon frame: source is only {}x{}",
            size, size, width, height
        );
    }
    if frame_sizes.is_empty() {
        bail!(
            "{} ({}x{}) is too small for any of the favicon sizes {:?}",
            source_png.display(),
            width,
            height,
            sizes
        );
    }

    let mut frames = Vec::with_capacity(frame_sizes.len());
    for &size in &frame_sizes {
        if size == 0 || size > MAX_FRAME_SIZE {
            bail!("favicon frame size {} must be between 1 and {}", size, MAX_FRAME_SIZE);
        }

        let bitmap = scale_to(&source, size);
        let frame = IcoFrame::as_png(bitmap.as_raw(), size, size, ExtendedColorType::Rgba8)
            .with_context(|| format!("Failed to encode {}x{} favicon frame", size, size))?;
        frames.push(frame);
    }

    let mut encoded: Vec<u8> = Vec::new();
    IcoEncoder::new(&mut encoded)
        .encode_images(&frames)
        .context("Failed to encode favicon")?;
    fs::write(ico_path, encoded)
        .with_context(|| format!("Failed to write {}", ico_path.display()))?;

    Ok(frame_sizes)
}

fn scale_to(source: &RgbaImage, size: u32) -> RgbaImage {
    if source.dimensions() == (size, size) {
        return source.clone();
    }
    imageops::resize(source, size, size, FilterType::Lanczos3)
}
