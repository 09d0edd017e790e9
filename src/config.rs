use bon::Builder;

use crate::color::Color;
use crate::error::{PovError, Result};

// ============================================================================
// SAMPLING CONFIGURATION
// ============================================================================

/// Shape of the polar averaging neighbourhood around each LED position.
///
/// Point counts are always odd so the neighbourhood is symmetric around the
/// exact query point; an even count is bumped by one at construction time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    angle_span_degrees: f64,
    angle_sample_points: usize,
    radius_span: f64,
    radius_sample_points: usize,
    angle_step_radians: f64,
    radius_step: f64,
}

impl SamplingConfig {
    /// Build a config from user facing parameters.
    ///
    /// `angle_span_degrees` and `radius_span` are the total width of the
    /// neighbourhood (half on each side of the LED position).
    pub fn new(
        angle_span_degrees: f64,
        angle_sample_points: usize,
        radius_span: f64,
        radius_sample_points: usize,
    ) -> Result<Self> {
        check_span("angle span", angle_span_degrees)?;
        check_span("radius span", radius_span)?;

        let angle_sample_points = make_odd(angle_sample_points);
        let radius_sample_points = make_odd(radius_sample_points);

        let angle_step_degrees = step_for(angle_span_degrees, angle_sample_points);
        let radius_step = step_for(radius_span, radius_sample_points);

        Ok(Self {
            angle_span_degrees,
            angle_sample_points,
            radius_span,
            radius_sample_points,
            angle_step_radians: angle_step_degrees.to_radians(),
            radius_step,
        })
    }

    pub fn angle_span_degrees(&self) -> f64 {
        self.angle_span_degrees
    }

    pub fn angle_sample_points(&self) -> usize {
        self.angle_sample_points
    }

    pub fn radius_span(&self) -> f64 {
        self.radius_span
    }

    pub fn radius_sample_points(&self) -> usize {
        self.radius_sample_points
    }

    /// Angular distance between consecutive sample points, in radians.
    pub fn angle_step_radians(&self) -> f64 {
        self.angle_step_radians
    }

    /// Radial distance between consecutive sample points, in pixels.
    pub fn radius_step(&self) -> f64 {
        self.radius_step
    }

    /// Number of sample points in one footprint.
    pub fn points_per_sample(&self) -> usize {
        self.angle_sample_points * self.radius_sample_points
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            angle_span_degrees: 1.0,
            angle_sample_points: 3,
            radius_span: 10.0,
            radius_sample_points: 3,
            angle_step_radians: 0.5_f64.to_radians(),
            radius_step: 5.0,
        }
    }
}

fn make_odd(points: usize) -> usize {
    if points % 2 == 0 {
        points + 1
    } else {
        points
    }
}

fn step_for(span: f64, points: usize) -> f64 {
    if points > 1 {
        span / (points - 1) as f64
    } else {
        0.0
    }
}

fn check_span(name: &str, span: f64) -> Result<()> {
    if !span.is_finite() || span < 0.0 {
        return Err(PovError::InvalidConfig(format!(
            "{name} must be a finite, non-negative number (got {span})"
        )));
    }
    Ok(())
}

/// Upper bound on the number of arm positions in one revolution.
pub const MAX_SWEEP_COLUMNS: usize = 360_000;

/// Validate the angular resolution of a sweep, in degrees.
///
/// Steps finer than `360 / MAX_SWEEP_COLUMNS` are rejected.
pub fn check_angle_step(angle_step: f64) -> Result<f64> {
    if !angle_step.is_finite() || angle_step <= 0.0 || angle_step > 360.0 {
        return Err(PovError::InvalidConfig(format!(
            "angle step must be in (0, 360] degrees (got {angle_step})"
        )));
    }
    if 360.0 / angle_step > MAX_SWEEP_COLUMNS as f64 {
        return Err(PovError::InvalidConfig(format!(
            "angle step {angle_step} gives more than {MAX_SWEEP_COLUMNS} positions per revolution"
        )));
    }
    Ok(angle_step)
}

// ============================================================================
// LED LAYOUT
// ============================================================================

/// Geometry of the LEDs along the rotating arm, in source image pixels.
#[derive(Debug, Clone, Builder)]
pub struct LedLayout {
    #[builder(default = 15)]
    pub led_count: usize,
    #[builder(default = 8.0)]
    pub led_radius: f64,
    /// Distance between the borders of two neighbouring LEDs.
    #[builder(default = 1.0)]
    pub led_separation: f64,
    /// Radial distance between the shaft and the first LED.
    #[builder(default = 15.0)]
    pub led_center_offset: f64,
}

impl LedLayout {
    /// Center to center distance between consecutive LEDs.
    pub fn distance_between_leds(&self) -> f64 {
        2.0 * self.led_radius + self.led_separation
    }

    /// Radial position of LED `idx`.
    pub fn radius_of(&self, idx: usize) -> f64 {
        self.led_center_offset + idx as f64 * self.distance_between_leds()
    }

    pub fn radii(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.led_count).map(move |idx| self.radius_of(idx))
    }
}

impl Default for LedLayout {
    fn default() -> Self {
        Self::builder().build()
    }
}

// ============================================================================
// PRESENTER CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Builder)]
pub struct PresenterConfig {
    #[builder(default = "POV simulator".to_string())]
    pub title: String,

    // Window and frame
    /// Side of the square background frame; the window has the same size.
    #[builder(default = 600)]
    pub frame_width: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    /// Angular resolution of the sweep, in degrees.
    #[builder(default = 1.0)]
    pub angle_step: f64,

    // Source image overlay
    /// Opacity of the source image drawn behind the LEDs.
    #[builder(default = 10)]
    pub image_alpha: u8,

    // Colors
    #[builder(default = Color::WHITE)]
    pub background_color: Color,
    #[builder(default = Color::GRAY)]
    pub canvas_color: Color,
    #[builder(default = Color::BLACK)]
    pub led_line_color: Color,
    #[builder(default = Color::RED)]
    pub image_border_color: Color,

    // Shaft
    #[builder(default = 3)]
    pub shaft_radius: i32,
    #[builder(default = Color::BLACK)]
    pub shaft_color: Color,

    /// Initial state of the footprint overlay.
    #[builder(default = true)]
    pub show_footprint: bool,

    // HUD text, only drawn when font data is supplied
    pub font_data: Option<Vec<u8>>,
    #[builder(default = 18.0)]
    pub hud_font_size: f32,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
