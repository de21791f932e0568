use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;

use crate::config::ConverterConfig;
use crate::favicon::write_favicon;
use crate::render::{IconPage, Viewport};

/// Files produced by one converter run
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub pngs: Vec<PathBuf>,
    pub favicon: PathBuf,
    pub favicon_sizes: Vec<u32>,
}

/// Render the configured SVG at every target size, then bundle one of the
/// outputs into a multi-resolution favicon.
///
/// Nothing is created when the SVG is missing.
pub fn convert_svg_to_icons(config: &ConverterConfig) -> Result<ConversionReport> {
    if !config.svg_source.exists() {
        bail!("{} not found.", config.svg_source.display());
    }
    config.validate()?;

    fs::create_dir_all(&config.assets_dir).with_context(|| {
        format!("Failed to create output directory {}", config.assets_dir.display())
    })?;

    let mut page = IconPage::from_svg_file(&config.svg_source)?;

    // One capture at a time: each needs the page resized first
    let mut pngs = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let output_path = config.assets_dir.join(&target.file_name);
        println!(
            "Generating {} ({}x{})...",
            output_path.display(),
            target.width,
            target.height
        );

        page.set_viewport_size(Viewport::new(target.width, target.height));
        page.screenshot_to(&output_path)?;
        pngs.push(output_path);
    }

    let favicon = config.favicon_path();
    println!("Generating {}...", favicon.display());
    let favicon_source = config.assets_dir.join(&config.favicon.source_file);
    let favicon_sizes = write_favicon(&favicon_source, &favicon, &config.favicon.sizes)?;

    Ok(ConversionReport {
        pngs,
        favicon,
        favicon_sizes,
    })
}
