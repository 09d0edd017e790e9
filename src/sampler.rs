//! Polar resampling of a Cartesian image.
//!
//! For an LED at radius `r` and sweep angle `a`, the sampler lays a small
//! grid of points over the polar patch around `(a, r)` (the footprint),
//! looks every point up in the source image and averages the alpha weighted
//! colors.

use log::{debug, warn};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::color::{Color, LedColor, Rgba};
use crate::config::{LedLayout, SamplingConfig, MAX_SWEEP_COLUMNS};
use crate::source::PixelSource;
use crate::table::LedColorTable;

/// Continuous Cartesian position in source image space (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Sample grid of one query, indexed `[angle_index][radius_index]`.
pub type Footprint = Vec<Vec<Point>>;

/// Maps polar LED positions onto averaged colors of a source image.
pub struct PolarSampler<'a, I: PixelSource> {
    image: &'a I,
    config: SamplingConfig,
    background: Color,
}

impl<'a, I: PixelSource> PolarSampler<'a, I> {
    pub fn new(image: &'a I, config: SamplingConfig, background: Color) -> Self {
        Self {
            image,
            config,
            background,
        }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Project `(angle, radius)` onto the image, flipping y into screen space.
    fn project(&self, angle_radians: f64, radius: f64) -> Point {
        let x = self.image.center_x() + radius * angle_radians.cos();
        let y = self.image.center_y() + radius * angle_radians.sin();
        Point::new(x, self.image.height() as f64 - y)
    }

    /// Sample points around `(angle, radius)`; `angle` is in degrees.
    pub fn compute_footprint(&self, angle: f64, radius: f64) -> Footprint {
        let angle_points = self.config.angle_sample_points();
        let radius_points = self.config.radius_sample_points();
        let angle_mid = (angle_points - 1) as f64 / 2.0;
        let radius_mid = (radius_points - 1) as f64 / 2.0;
        let base_angle = angle.to_radians();

        (0..angle_points)
            .map(|t| {
                let sample_angle =
                    base_angle + self.config.angle_step_radians() * (t as f64 - angle_mid);
                (0..radius_points)
                    .map(|r| {
                        let sample_radius =
                            radius + self.config.radius_step() * (r as f64 - radius_mid);
                        self.project(sample_angle, sample_radius)
                    })
                    .collect()
            })
            .collect()
    }

    /// The four extreme corners of the footprint, in polygon order.
    pub fn footprint_outline(&self, angle: f64, radius: f64) -> [Point; 4] {
        let footprint = self.compute_footprint(angle, radius);
        let first = &footprint[0];
        let last = &footprint[footprint.len() - 1];
        [
            first[0],
            first[first.len() - 1],
            last[last.len() - 1],
            last[0],
        ]
    }

    /// Pixel under `point`, or `None` outside the image.
    fn lookup(&self, point: Point) -> Option<Rgba> {
        let width = self.image.width() as f64;
        let height = self.image.height() as f64;
        let inside = point.x > -1.0 && point.x < width && point.y > -1.0 && point.y < height;
        // Truncation toward zero maps (-1, 0) onto column/row 0.
        inside.then(|| self.image.pixel(point.x as u32, point.y as u32))
    }

    /// Averaged color seen by an LED at `radius` when the arm is at `angle` degrees.
    ///
    /// Points outside the image reuse the last in-bounds pixel of this
    /// traversal, or an opaque background pixel if none was seen yet. Fully
    /// transparent pixels take the background RGB before weighting. The sum
    /// is divided by the number of points, not by the total alpha.
    pub fn sample_color(&self, angle: f64, radius: f64) -> LedColor {
        let mut last_good = self.background.with_alpha(255);
        let (mut red, mut green, mut blue) = (0.0, 0.0, 0.0);

        for point in self.compute_footprint(angle, radius).into_iter().flatten() {
            let pixel = match self.lookup(point) {
                Some(pixel) => {
                    last_good = pixel;
                    pixel
                }
                None => last_good,
            };

            let pixel = if pixel.a < 1 {
                pixel.with_rgb(self.background)
            } else {
                pixel
            };

            let weight = pixel.a as f64 / 255.0;
            red += pixel.r as f64 * weight;
            green += pixel.g as f64 * weight;
            blue += pixel.b as f64 * weight;
        }

        let count = self.config.points_per_sample() as f64;
        LedColor::new(red / count, green / count, blue / count)
    }

    /// One full revolution at `radius`, from 0 up to (excluding) 360 degrees.
    ///
    /// Steps that are not positive, or that would give more than
    /// [`MAX_SWEEP_COLUMNS`] positions, yield an empty sweep.
    pub fn sample_sweep(&self, angle_step: f64, radius: f64) -> Vec<LedColor> {
        if !(angle_step > 0.0) {
            warn!("ignoring sweep with non-positive angle step {angle_step}");
            return Vec::new();
        }
        let columns = (360.0 / angle_step).ceil();
        if columns > MAX_SWEEP_COLUMNS as f64 + 1.0 {
            warn!("ignoring sweep with angle step {angle_step}: {columns} positions");
            return Vec::new();
        }

        let mut colors = Vec::with_capacity(columns as usize);
        let mut angle = 0.0;
        while angle < 360.0 {
            colors.push(self.sample_color(angle, radius));
            angle += angle_step;
        }
        colors
    }
}

impl<I: PixelSource + Sync> PolarSampler<'_, I> {
    /// Sweep every LED of `layout` and collect the results into a table.
    pub fn build_color_table(&self, layout: &LedLayout, angle_step: f64) -> LedColorTable {
        let started = Instant::now();
        let radii: Vec<f64> = layout.radii().collect();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<LedColor>> = radii
            .par_iter()
            .map(|&radius| self.sample_sweep(angle_step, radius))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<LedColor>> = radii
            .iter()
            .map(|&radius| self.sample_sweep(angle_step, radius))
            .collect();

        debug!(
            "sampled {} leds x {} angles in {:?}",
            rows.len(),
            rows.first().map_or(0, Vec::len),
            started.elapsed()
        );
        LedColorTable::new(rows, angle_step)
    }
}
