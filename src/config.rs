use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{favicon, paths, targets};

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub resizer: ResizerConfig,
}

/// One output bitmap: its pixel size and the file it is written to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct IconTarget {
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

impl IconTarget {
    pub fn new(width: u32, height: u32, file_name: impl Into<String>) -> Self {
        IconTarget {
            width,
            height,
            file_name: file_name.into(),
        }
    }

    pub fn square(size: u32, file_name: impl Into<String>) -> Self {
        Self::new(size, size, file_name)
    }
}

fn targets_from(table: &[(u32, u32, &str)]) -> Vec<IconTarget> {
    table
        .iter()
        .map(|&(width, height, name)| IconTarget::new(width, height, name))
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConverterConfig {
    #[serde(default = "default_svg_source")]
    pub svg_source: PathBuf,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    #[serde(default = "default_converter_targets")]
    pub targets: Vec<IconTarget>,
    #[serde(default)]
    pub favicon: FaviconConfig,
}

fn default_svg_source() -> PathBuf {
    PathBuf::from(paths::SVG_SOURCE)
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from(paths::ASSETS_DIR)
}

fn default_converter_targets() -> Vec<IconTarget> {
    targets_from(&targets::CONVERTER)
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            svg_source: default_svg_source(),
            assets_dir: default_assets_dir(),
            targets: default_converter_targets(),
            favicon: FaviconConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// Where the multi-resolution ICO lands: one level above the assets directory
    pub fn favicon_path(&self) -> PathBuf {
        let parent = self.assets_dir.parent().unwrap_or_else(|| Path::new(""));
        parent.join(&self.favicon.file_name)
    }

    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.targets
            .iter()
            .map(|target| self.assets_dir.join(&target.file_name))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        validate_targets("converter", &self.targets)?;

        let ico = &self.favicon;
        if ico.file_name.is_empty() {
            bail!("favicon file_name cannot be empty");
        }
        if ico.sizes.is_empty() {
            bail!("favicon sizes cannot be empty");
        }
        for &size in &ico.sizes {
            if size == 0 || size > favicon::MAX_FRAME_SIZE {
                bail!(
                    "favicon size {} must be between 1 and {}",
                    size,
                    favicon::MAX_FRAME_SIZE
                );
            }
        }

        // The ICO is built from one of the converter's own square outputs
        let Some(source) = self
            .targets
            .iter()
            .find(|target| target.file_name == ico.source_file)
        else {
            bail!(
                "favicon source_file {} is not one of the converter targets",
                ico.source_file
            );
        };
        if source.width != source.height {
            bail!(
                "favicon source_file {} is {}x{}; it must be square",
                source.file_name,
                source.width,
                source.height
            );
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FaviconConfig {
    #[serde(default = "default_favicon_file_name")]
    pub file_name: String,
    #[serde(default = "default_favicon_source")]
    pub source_file: String,
    #[serde(default = "default_favicon_sizes")]
    pub sizes: Vec<u32>,
}

fn default_favicon_file_name() -> String {
    favicon::FILE_NAME.to_string()
}

fn default_favicon_source() -> String {
    favicon::SOURCE_FILE.to_string()
}

fn default_favicon_sizes() -> Vec<u32> {
    favicon::SIZES.to_vec()
}

impl Default for FaviconConfig {
    fn default() -> Self {
        FaviconConfig {
            file_name: default_favicon_file_name(),
            source_file: default_favicon_source(),
            sizes: default_favicon_sizes(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResizerConfig {
    #[serde(default = "default_resize_source")]
    pub source: PathBuf,
    #[serde(default = "default_assets_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_resizer_targets")]
    pub targets: Vec<IconTarget>,
}

fn default_resize_source() -> PathBuf {
    PathBuf::from(paths::RESIZE_SOURCE)
}

fn default_resizer_targets() -> Vec<IconTarget> {
    targets_from(&targets::RESIZER)
}

impl Default for ResizerConfig {
    fn default() -> Self {
        ResizerConfig {
            source: default_resize_source(),
            output_dir: default_assets_dir(),
            targets: default_resizer_targets(),
        }
    }
}

impl ResizerConfig {
    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.targets
            .iter()
            .map(|target| self.output_dir.join(&target.file_name))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        validate_targets("resizer", &self.targets)
    }
}

impl Config {
    /// Load from `path`, or from `icons.yaml` in the working directory if it
    /// exists, or fall back to the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("{} not found", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let default_path = PathBuf::from(paths::CONFIG_FILE);
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file {}", config_path.display()))?;

        Ok(config)
    }

    /// Parse only. Each tool validates its own section before running, so a
    /// broken converter section does not stop the resizer and vice versa.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Validate both tools' sections. Each tool only needs its own section to
    /// be valid; see `ConverterConfig::validate` and `ResizerConfig::validate`.
    pub fn validate(&self) -> Result<()> {
        self.converter.validate()?;
        self.resizer.validate()?;
        Ok(())
    }

    /// Output files both tools would write. The two tools are independent, so
    /// a shared path means whichever runs last wins.
    pub fn colliding_outputs(&self) -> Vec<PathBuf> {
        let converter: HashSet<PathBuf> = self.converter.output_paths().into_iter().collect();

        self.resizer
            .output_paths()
            .into_iter()
            .filter(|path| converter.contains(path))
            .collect()
    }

    pub fn warn_on_collisions(&self) {
        let collisions = self.colliding_outputs();
        if collisions.is_empty() {
            return;
        }

        eprintln!("⚠️  convert-icons and resize-icons both write these files:");
        for path in &collisions {
            eprintln!("   {}", path.display());
        }
        eprintln!("   Whichever tool runs last overwrites the other's output");
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .context("Failed to create config directory")?;
        }

        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs::write(path, yaml)
            .context("Failed to write config file")?;

        Ok(())
    }
}

fn validate_targets(tool: &str, targets: &[IconTarget]) -> Result<()> {
    if targets.is_empty() {
        bail!("{} targets cannot be empty", tool);
    }

    let mut seen = HashSet::new();
    for target in targets {
        if target.width == 0 || target.height == 0 {
            bail!(
                "{} target {} must have a non-zero size (got {}x{})",
                tool,
                target.file_name,
                target.width,
                target.height
            );
        }
        if target.file_name.is_empty() {
            bail!("{} target file_name cannot be empty", tool);
        }
        if !seen.insert(target.file_name.as_str()) {
            bail!("{} target {} is listed twice", tool, target.file_name);
        }
    }

    Ok(())
}
