use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CineError, CineResult};

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod paint;

/// A painted frame: row-major RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
    /// Whether `data` carries premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Frame filled with one premultiplied color.
    pub fn filled(width: u32, height: u32, rgba_premul: [u8; 4]) -> CineResult<Self> {
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CineError::render("frame size overflow"))?;
        Ok(Self {
            width,
            height,
            data: rgba_premul.repeat(pixels),
            premultiplied: true,
        })
    }

    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> CineResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Flatten `frame` over `bg_rgba` and write it as an opaque PNG.
#[tracing::instrument(skip(frame), fields(width = frame.width, height = frame.height))]
pub fn save_png(frame: &FrameRGBA, bg_rgba: [u8; 4], path: &Path) -> CineResult<()> {
    let mut flat = vec![0u8; frame.data.len()];
    composite::flatten_to_opaque(&mut flat, &frame.data, frame.premultiplied, bg_rgba)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &flat,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
