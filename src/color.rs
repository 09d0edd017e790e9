// ============================================================================
// COLOR TYPES
// ============================================================================

/// Display color for frame elements and the background frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(255, 0, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const GRAY: Color = Color::new(150, 150, 150);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Same color with the given alpha channel.
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

/// One source image pixel, straight (non premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Copy of this pixel with its color channels taken from `color`.
    pub const fn with_rgb(self, color: Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
            a: self.a,
        }
    }
}

impl From<image::Rgba<u8>> for Rgba {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self { r, g, b, a }
    }
}

/// Averaged LED color as produced by the sampler.
///
/// Channels stay floating point and are not clamped; conversion to a
/// displayable [`Color`] happens in [`LedColor::to_color`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LedColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl LedColor {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Clamp to [0, 255] and truncate each channel.
    pub fn to_color(self) -> Color {
        let channel = |v: f64| v.clamp(0.0, 255.0) as u8;
        Color::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl From<Color> for LedColor {
    fn from(c: Color) -> Self {
        Self::new(c.r as f64, c.g as f64, c.b as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_color_truncates_and_clamps() {
        let c = LedColor::new(12.9, -4.0, 300.5).to_color();
        assert_eq!(c, Color::new(12, 0, 255));
    }

    #[test]
    fn with_rgb_keeps_alpha() {
        let px = Rgba::new(1, 2, 3, 0).with_rgb(Color::WHITE);
        assert_eq!(px, Rgba::new(255, 255, 255, 0));
    }
}
