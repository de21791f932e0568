use anyhow::{Context, Result, bail};
use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::constants::page::CONTAINER_FRACTION;

/// Size of the rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Viewport { width, height }
    }
}

/// Where the document ends up on the surface: uniform scale plus the
/// top-left offset of the scaled document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Placement {
    /// Centre a container of `CONTAINER_FRACTION` of the viewport, stretch the
    /// document to fill it and keep its aspect ratio (`xMidYMid meet`)
    pub fn fit(document_width: f32, document_height: f32, viewport: Viewport) -> Self {
        let viewport_width = viewport.width as f32;
        let viewport_height = viewport.height as f32;
        let container_width = viewport_width * CONTAINER_FRACTION;
        let container_height = viewport_height * CONTAINER_FRACTION;

        let scale = (container_width / document_width).min(container_height / document_height);

        Placement {
            scale,
            offset_x: (viewport_width - document_width * scale) / 2.0,
            offset_y: (viewport_height - document_height * scale) / 2.0,
        }
    }

    fn transform(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.offset_x,
            self.offset_y,
        )
    }
}

/// Force the root `<svg>` to `width="100%" height="100%"` so the document is
/// sized by its `viewBox` and fills the container, whatever intrinsic size the
/// markup declares. Documents without a `viewBox` are returned unchanged.
pub fn fill_container(svg: &str) -> Cow<'_, str> {
    let Some((start, end)) = root_svg_tag(svg) else {
        return Cow::Borrowed(svg);
    };

    let tag = &svg[start..end];
    let body = tag["<svg".len()..tag.len() - 1].trim_end();
    let (body, self_closing) = match body.strip_suffix('/') {
        Some(body) => (body, true),
        None => (body, false),
    };

    let attributes = split_attributes(body);
    if !attributes.iter().any(|(name, _)| *name == "viewBox") {
        return Cow::Borrowed(svg);
    }

    let mut rewritten = String::with_capacity(tag.len() + 32);
    rewritten.push_str("<svg");
    for (name, raw) in &attributes {
        if *name == "width" || *name == "height" {
            continue;
        }
        rewritten.push(' ');
        rewritten.push_str(raw);
    }
    rewritten.push_str(r#" width="100%" height="100%""#);
    if self_closing {
        rewritten.push('/');
    }
    rewritten.push('>');

    Cow::Owned(format!("{}{}{}", &svg[..start], rewritten, &svg[end..]))
}

/// Byte range of the root `<svg ...>` start tag, including the closing `>`
fn root_svg_tag(svg: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    let start = loop {
        let found = from + svg[from..].find("<svg")?;
        let next = svg[found + 4..].chars().next()?;
        if next.is_ascii_whitespace() || next == '>' || next == '/' {
            break found;
        }
        from = found + 4;
    };

    let mut quote = None;
    for (offset, c) in svg[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some((start, start + offset + 1)),
            _ => {}
        }
    }
    None
}

/// `(name, raw "name=\"value\"" text)` for every attribute of a start tag body
fn split_attributes(body: &str) -> Vec<(&str, &str)> {
    let bytes = body.as_bytes();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let attr_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        let name = &body[attr_start..i];

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                i = (i + 1).min(bytes.len());
            }
        }

        attributes.push((name, &body[attr_start..i]));
    }

    attributes
}

/// A headless page holding one SVG document. The viewport is the only
/// mutable state; every screenshot is taken at the current viewport size.
pub struct IconPage {
    tree: usvg::Tree,
    viewport: Viewport,
}

impl IconPage {
    pub fn from_svg_file(path: &Path) -> Result<Self> {
        let svg_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read SVG {}", path.display()))?;

        let mut opt = usvg::Options::default();
        // Relative image references resolve next to the SVG
        opt.resources_dir = fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));
        Arc::make_mut(&mut opt.fontdb).load_system_fonts();

        Self::from_svg_str(&svg_content, &opt)
            .with_context(|| format!("Failed to load SVG {}", path.display()))
    }

    pub fn from_svg_str(svg_content: &str, opt: &usvg::Options) -> Result<Self> {
        let svg_content = fill_container(svg_content);
        let tree = usvg::Tree::from_str(&svg_content, opt)
            .context("Failed to parse SVG")?;

        Ok(IconPage {
            tree,
            viewport: Viewport::new(1, 1),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn placement(&self) -> Placement {
        let size = self.tree.size();
        Placement::fit(size.width(), size.height(), self.viewport)
    }

    /// Render the current viewport with no background fill
    pub fn screenshot(&self) -> Result<RgbaImage> {
        let Viewport { width, height } = self.viewport;
        let Some(mut pixmap) = tiny_skia::Pixmap::new(width, height) else {
            bail!("Cannot allocate a {}x{} rendering surface", width, height);
        };

        resvg::render(&self.tree, self.placement().transform(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; PNG wants straight alpha
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        RgbaImage::from_raw(width, height, rgba)
            .context("Rendered buffer does not match the viewport size")
    }

    pub fn screenshot_to(&self, path: &Path) -> Result<()> {
        let image = self.screenshot()?;
        image
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
