use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::PathBuf;

use crate::config::{IconTarget, ResizerConfig};

/// Resample `source` to the target's exact size
pub fn resize_to(source: &DynamicImage, target: &IconTarget) -> DynamicImage {
    source.resize_exact(target.width, target.height, FilterType::Lanczos3)
}

/// Downsize the configured PNG into every target. Each output is resampled
/// from the original bitmap, never from a smaller output.
///
/// Nothing is created when the source is missing.
pub fn resize_icons(config: &ResizerConfig) -> Result<Vec<PathBuf>> {
    if !config.source.exists() {
        bail!("{} not found.", config.source.display());
    }
    config.validate()?;

    let source = image::open(&config.source)
        .with_context(|| format!("Failed to open {}", config.source.display()))?;

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    let mut written = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let output_path = config.output_dir.join(&target.file_name);
        resize_to(&source, target)
            .save_with_format(&output_path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        println!("Created {}", output_path.display());
        written.push(output_path);
    }

    Ok(written)
}
