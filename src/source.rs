use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use log::{debug, info};

use crate::color::Rgba;
use crate::error::{PovError, Result};

/// Read-only pixel grid the sampler resamples from.
///
/// Callers guarantee `x < width()` and `y < height()` when calling
/// [`PixelSource::pixel`].
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Rgba;

    /// Polar origin, horizontal. Integer division, like a screen rect center.
    fn center_x(&self) -> f64 {
        (self.width() / 2) as f64
    }

    fn center_y(&self) -> f64 {
        (self.height() / 2) as f64
    }
}

/// Immutable RGBA source image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Wrap an already decoded image; must be at least 1x1.
    pub fn new(pixels: RgbaImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(PovError::InvalidConfig(
                "source image must be at least 1x1 pixels".to_string(),
            ));
        }
        Ok(Self { pixels })
    }

    /// Decode `path` and scale it to a `frame_width` square.
    pub fn open(path: impl AsRef<Path>, frame_width: u32) -> Result<Self> {
        let path = path.as_ref();
        if frame_width == 0 {
            return Err(PovError::InvalidConfig(
                "frame width must be positive".to_string(),
            ));
        }

        let decoded = image::open(path)?;
        debug!(
            "decoded {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );

        let scaled = decoded
            .resize_exact(frame_width, frame_width, FilterType::Triangle)
            .to_rgba8();
        info!(
            "loaded source image {} scaled to {}x{}",
            path.display(),
            scaled.width(),
            scaled.height()
        );
        Self::new(scaled)
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PixelSource for SourceImage {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        (*self.pixels.get_pixel(x, y)).into()
    }
}
