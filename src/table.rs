use std::io::Write;

use crate::color::LedColor;
use crate::error::Result;

/// Precomputed LED colors, `[led][angle_index]`.
///
/// Built once before display starts; the presenter only reads from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedColorTable {
    rows: Vec<Vec<LedColor>>,
    angle_step: f64,
}

impl LedColorTable {
    pub fn new(rows: Vec<Vec<LedColor>>, angle_step: f64) -> Self {
        Self { rows, angle_step }
    }

    pub fn led_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of discrete arm positions per revolution.
    pub fn angles_per_led(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Angular resolution the table was sampled at, in degrees.
    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    /// Table column for an arm angle in degrees: `floor(angle / step)`,
    /// wrapped into one revolution.
    pub fn angle_index(&self, angle: f64) -> usize {
        let columns = self.angles_per_led();
        if columns == 0 {
            return 0;
        }
        let idx = (angle.rem_euclid(360.0) / self.angle_step).floor() as usize;
        idx.min(columns - 1)
    }

    /// Angle in degrees of column `idx`.
    pub fn angle_of(&self, idx: usize) -> f64 {
        idx as f64 * self.angle_step
    }

    pub fn color(&self, led: usize, angle: f64) -> Option<LedColor> {
        self.color_at(led, self.angle_index(angle))
    }

    /// Color of `led` in column `idx`, without going through an angle.
    pub fn color_at(&self, led: usize, idx: usize) -> Option<LedColor> {
        self.rows.get(led).and_then(|row| row.get(idx)).copied()
    }

    pub fn row(&self, led: usize) -> Option<&[LedColor]> {
        self.rows.get(led).map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<LedColor>] {
        &self.rows
    }

    /// Dump the table as `led,angle_index,angle,r,g,b` lines with a header.
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "led,angle_index,angle,r,g,b")?;
        for (led, row) in self.rows.iter().enumerate() {
            for (idx, c) in row.iter().enumerate() {
                writeln!(
                    out,
                    "{led},{idx},{},{:.3},{:.3},{:.3}",
                    self.angle_of(idx),
                    c.r,
                    c.g,
                    c.b
                )?;
            }
        }
        out.flush()?;
        Ok(())
    }
}
