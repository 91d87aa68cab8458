use anyhow::{Context, Result};
use image::RgbaImage;
use log::debug;
use screenshots::Screen;

/// A single frame of the primary display.
pub struct Capture {
    pub image: RgbaImage,
    /// Display size as reported by the OS, in logical pixels.
    pub logical_size: (u32, u32),
}

impl Capture {
    pub fn raster_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

pub fn capture_screen() -> Result<Capture> {
    let screens = Screen::all()?;
    let screen = screens
        .iter()
        .find(|s| s.display_info.is_primary)
        .or_else(|| screens.first())
        .ok_or_else(|| anyhow::anyhow!("No screen found"))?;

    let image = screen
        .capture()
        .with_context(|| format!("capturing display {}", screen.display_info.id))?;
    let logical_size = (screen.display_info.width, screen.display_info.height);
    debug!(
        "Captured {}x{} raster for {}x{} logical display",
        image.width(),
        image.height(),
        logical_size.0,
        logical_size.1
    );

    Ok(Capture {
        image,
        logical_size,
    })
}
