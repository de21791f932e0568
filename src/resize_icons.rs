use anyhow::Result;
use clap::Parser;
use extension_icons::config::Config;
use extension_icons::resizer::resize_icons;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resize-icons")]
#[command(about = "Downsize a pre-rendered PNG into square icon sizes", long_about = None)]
struct Cli {
    /// YAML config file (defaults to icons.yaml in the working directory, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Source PNG, overriding the configured one
    #[arg(short, long)]
    source: Option<PathBuf>,
    /// Directory for the resized PNGs
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.resizer.source = source;
    }
    if let Some(out_dir) = cli.out_dir {
        config.resizer.output_dir = out_dir;
    }

    config.warn_on_collisions();

    resize_icons(&config.resizer)?;
    println!("Icon resizing complete.");

    Ok(())
}
