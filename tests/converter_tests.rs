use extension_icons::config::{ConverterConfig, IconTarget};
use extension_icons::converter::convert_svg_to_icons;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// A 512x512 icon with no background: one filled circle in the middle
const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="512" height="512" viewBox="0 0 512 512">
    <circle cx="256" cy="256" r="200" fill="#1da1f2"/>
</svg>"##;

struct Workspace {
    _dir: TempDir,
    root: PathBuf,
    config: ConverterConfig,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = dir.path().to_path_buf();
    let svg_path = root.join("icon.svg");
    fs::write(&svg_path, ICON_SVG).expect("Failed to write SVG fixture");

    let config = ConverterConfig {
        svg_source: svg_path,
        assets_dir: root.join("assets"),
        ..ConverterConfig::default()
    };

    Workspace {
        _dir: dir,
        root,
        config,
    }
}

/// Width/height bytes of every ICONDIRENTRY (0 encodes 256)
fn ico_frame_sizes(path: &Path) -> Vec<(u32, u32)> {
    let bytes = fs::read(path).expect("Failed to read ICO");
    assert_eq!(&bytes[0..4], &[0, 0, 1, 0], "not an ICO header");

    let count = u16::from_le_bytes([bytes[4], bytes[5]]) as usize;
    (0..count)
        .map(|i| {
            let entry = 6 + i * 16;
            let dim = |b: u8| if b == 0 { 256 } else { b as u32 };
            (dim(bytes[entry]), dim(bytes[entry + 1]))
        })
        .collect()
}

#[test]
fn test_generates_every_icon_and_favicon() {
    let ws = workspace();
    let report = convert_svg_to_icons(&ws.config).expect("conversion failed");

    let expected = [
        ("icon_16.png", 16),
        ("icon_48.png", 48),
        ("icon_128.png", 128),
        ("pwa_icon_192.png", 192),
        ("pwa_icon_512.png", 512),
    ];
    assert_eq!(report.pngs.len(), expected.len());

    for (name, size) in expected {
        let path = ws.root.join("assets").join(name);
        assert!(path.exists(), "{} was not written", name);
        let img = image::open(&path).expect("Failed to open output");
        assert_eq!((img.width(), img.height()), (size, size), "{} has wrong size", name);
    }

    // favicon lands one level above the assets directory
    let favicon = ws.root.join("favicon.ico");
    assert_eq!(report.favicon, favicon);
    assert!(favicon.exists());
    assert!(!ws.root.join("assets").join("favicon.ico").exists());
}

#[test]
fn test_favicon_has_five_frames() {
    let ws = workspace();
    let report = convert_svg_to_icons(&ws.config).expect("conversion failed");

    assert_eq!(report.favicon_sizes, vec![16, 32, 48, 64, 128]);
    assert_eq!(
        ico_frame_sizes(&report.favicon),
        vec![(16, 16), (32, 32), (48, 48), (64, 64), (128, 128)]
    );

    // The decoder picks the largest frame
    let largest = image::open(&report.favicon).expect("Failed to decode ICO");
    assert_eq!((largest.width(), largest.height()), (128, 128));
}

#[test]
fn test_background_stays_transparent() {
    let ws = workspace();
    let report = convert_svg_to_icons(&ws.config).expect("conversion failed");

    for path in &report.pngs {
        let img = image::open(path).expect("Failed to open output").to_rgba8();
        let (w, h) = img.dimensions();

        for (x, y) in [(0, 0), (w - 1, 0), (0, h - 1), (w - 1, h - 1)] {
            assert_eq!(img.get_pixel(x, y).0[3], 0, "{} corner is not transparent", path.display());
        }
        assert!(img.get_pixel(w / 2, h / 2).0[3] > 0, "{} has no content", path.display());
    }
}

#[test]
fn test_missing_svg_creates_nothing() {
    let ws = workspace();
    let config = ConverterConfig {
        svg_source: ws.root.join("missing.svg"),
        ..ws.config.clone()
    };

    let err = convert_svg_to_icons(&config).unwrap_err();
    assert_eq!(err.to_string(), format!("{} not found.", config.svg_source.display()));
    assert!(!ws.root.join("assets").exists());
    assert!(!ws.root.join("favicon.ico").exists());
}

#[test]
fn test_non_square_favicon_source_rejected_before_rendering() {
    let ws = workspace();
    let mut config = ws.config.clone();
    config.targets.push(IconTarget::new(96, 64, "banner.png"));
    config.favicon.source_file = "banner.png".to_string();

    let err = convert_svg_to_icons(&config).unwrap_err();
    assert!(err.to_string().contains("must be square"));
    assert!(!ws.root.join("assets").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let ws = workspace();

    let first = convert_svg_to_icons(&ws.config).expect("first run failed");
    let mut before: Vec<Vec<u8>> = first.pngs.iter().map(|p| fs::read(p).unwrap()).collect();
    before.push(fs::read(&first.favicon).unwrap());

    let second = convert_svg_to_icons(&ws.config).expect("second run failed");
    let mut after: Vec<Vec<u8>> = second.pngs.iter().map(|p| fs::read(p).unwrap()).collect();
    after.push(fs::read(&second.favicon).unwrap());

    assert_eq!(before, after);
}

#[test]
fn test_custom_targets_and_small_favicon_source() {
    let ws = workspace();
    let mut config = ws.config.clone();
    config.targets = vec![
        IconTarget::new(32, 32, "small.png"),
        IconTarget::new(96, 64, "banner.png"),
    ];
    config.favicon.source_file = "small.png".to_string();

    let report = convert_svg_to_icons(&config).expect("conversion failed");

    let banner = image::open(ws.root.join("assets/banner.png")).unwrap();
    assert_eq!((banner.width(), banner.height()), (96, 64));

    // Frames larger than the 32px source are dropped
    assert_eq!(report.favicon_sizes, vec![16, 32]);
    assert_eq!(ico_frame_sizes(&report.favicon), vec![(16, 16), (32, 32)]);
}
