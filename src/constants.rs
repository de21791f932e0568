/// Default inputs, outputs and sizes shared by both icon tools

pub mod paths {
    /// SVG rendered by `convert-icons` when no other source is given
    pub const SVG_SOURCE: &str = "1492693505-1-twitter_83571.svg";

    /// Directory that receives every generated PNG
    pub const ASSETS_DIR: &str = "assets";

    /// Pre-rendered PNG downsized by `resize-icons`
    pub const RESIZE_SOURCE: &str = "assets/icon_original.png";

    /// Optional configuration file looked up in the working directory
    pub const CONFIG_FILE: &str = "icons.yaml";
}

pub mod targets {
    /// (width, height, file name) rendered from the SVG, in capture order
    pub const CONVERTER: [(u32, u32, &str); 5] = [
        (16, 16, "icon_16.png"),
        (48, 48, "icon_48.png"),
        (128, 128, "icon_128.png"),
        (192, 192, "pwa_icon_192.png"),
        (512, 512, "pwa_icon_512.png"),
    ];

    /// (width, height, file name) resampled from the source PNG
    pub const RESIZER: [(u32, u32, &str); 3] = [
        (16, 16, "icon_16.png"),
        (48, 48, "icon_48.png"),
        (128, 128, "icon_128.png"),
    ];
}

pub mod favicon {
    /// Written next to (not inside) the assets directory
    pub const FILE_NAME: &str = "favicon.ico";

    /// Converter output the ICO frames are derived from
    pub const SOURCE_FILE: &str = "icon_128.png";

    pub const SIZES: [u32; 5] = [16, 32, 48, 64, 128];

    /// ICO directory entries store each dimension in one byte (0 means 256)
    pub const MAX_FRAME_SIZE: u32 = 256;
}

pub mod page {
    /// Share of the viewport the SVG container occupies on each axis
    pub const CONTAINER_FRACTION: f32 = 0.8;
}
