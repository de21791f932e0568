use anyhow::Result;
use clap::Parser;
use extension_icons::config::Config;
use extension_icons::converter::convert_svg_to_icons;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convert-icons")]
#[command(about = "Render an SVG into extension/PWA icon PNGs and a favicon.ico", long_about = None)]
struct Cli {
    /// YAML config file (defaults to icons.yaml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// SVG to render, overriding the configured source
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Directory for the PNG outputs; favicon.ico goes one level above it
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
    /// Write the effective configuration to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(svg) = cli.svg {
        config.converter.svg_source = svg;
    }
    if let Some(out_dir) = cli.out_dir {
        config.converter.assets_dir = out_dir;
    }

    if let Some(path) = cli.write_config {
        config.validate()?;
        config.save(&path)?;
        println!("Wrote config to: {}", path.display());
        return Ok(());
    }

    config.warn_on_collisions();

    let report = convert_svg_to_icons(&config.converter)?;
    println!(
        "✓ {} PNGs, {} with frames {:?}",
        report.pngs.len(),
        report.favicon.display(),
        report.favicon_sizes
    );
    println!("Conversion completed successfully.");

    Ok(())
}
