// ============================================================================
// RETAINED MODE SCENE
// ============================================================================

use image::RgbaImage;
use rusttype::{point, Font, Scale};

use crate::color::Color;

#[derive(Clone, Debug)]
pub enum DrawCommand<'a> {
    Clear(Color),
    FillRect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
    },
    RectOutline {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
    },
    Image {
        x: i32,
        y: i32,
        image: &'a RgbaImage,
        alpha: u8,
    },
    Disc {
        cx: i32,
        cy: i32,
        radius: f64,
        color: Color,
    },
    Ring {
        cx: i32,
        cy: i32,
        radius: f64,
        color: Color,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: f32,
        color: Color,
    },
}

#[derive(Default)]
pub struct Scene<'a> {
    commands: Vec<DrawCommand<'a>>,
}

impl<'a> Scene<'a> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn add_command(&mut self, command: DrawCommand<'a>) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand<'a>] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, font: Option<&Font<'static>>) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::FillRect { x, y, w, h, color } => {
                    fill_rect(canvas, *x, *y, *w, *h, *color);
                }
                DrawCommand::RectOutline { x, y, w, h, color } => {
                    draw_rect_outline(canvas, *x, *y, *w, *h, *color);
                }
                DrawCommand::Image { x, y, image, alpha } => {
                    blit_image(canvas, *x, *y, image, *alpha);
                }
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    fill_disc(canvas, *cx, *cy, *radius, *color);
                }
                DrawCommand::Ring {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    draw_ring(canvas, *cx, *cy, *radius, *color);
                }
                DrawCommand::Polygon { points, color } => {
                    fill_polygon(canvas, points, *color);
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    // No font, no HUD.
                    if let Some(font) = font {
                        draw_text(canvas, *x, *y, text, font, Scale::uniform(*font_size), *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// RGBA8 frame buffer view, as handed out by `pixels`.
pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Color at `(x, y)`, `None` outside the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

/// Blend `color` over the frame at `(x, y)`; coordinates off the frame are ignored.
fn set_pixel(canvas: &mut Canvas, x: i32, y: i32, color: Color, alpha: f32) {
    if x < 0 || y < 0 || x as usize >= canvas.width || y as usize >= canvas.height {
        return;
    }
    let idx = (y as usize * canvas.width + x as usize) * 4;
    let Some(dst) = canvas.frame.get_mut(idx..idx + 4) else {
        return;
    };
    let a = alpha.clamp(0.0, 1.0);
    let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    let out = [
        blend(color.r, dst[0]),
        blend(color.g, dst[1]),
        blend(color.b, dst[2]),
        0xff,
    ];
    dst.copy_from_slice(&out);
}

fn fill_rect(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: Color) {
    for py in y..y + h {
        for px in x..x + w {
            set_pixel(canvas, px, py, color, 1.0);
        }
    }
}

fn draw_rect_outline(canvas: &mut Canvas, x: i32, y: i32, w: i32, h: i32, color: Color) {
    if w <= 0 || h <= 0 {
        return;
    }
    for px in x..x + w {
        set_pixel(canvas, px, y, color, 1.0);
        set_pixel(canvas, px, y + h - 1, color, 1.0);
    }
    for py in y..y + h {
        set_pixel(canvas, x, py, color, 1.0);
        set_pixel(canvas, x + w - 1, py, color, 1.0);
    }
}

/// Draw `image` with its top-left corner at `(x, y)`, scaled by a global alpha.
fn blit_image(canvas: &mut Canvas, x: i32, y: i32, image: &RgbaImage, alpha: u8) {
    let global = alpha as f32 / 255.0;
    for (ix, iy, px) in image.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let effective = global * a as f32 / 255.0;
        if effective > 0.0 {
            set_pixel(
                canvas,
                x + ix as i32,
                y + iy as i32,
                Color::new(r, g, b),
                effective,
            );
        }
    }
}

fn fill_disc(canvas: &mut Canvas, cx: i32, cy: i32, radius: f64, color: Color) {
    let reach = radius.ceil() as i32 + 1;
    for y in -reach..=reach {
        for x in -reach..=reach {
            let dist = ((x * x + y * y) as f64).sqrt();
            let aa = if dist > radius {
                1.0 - (dist - radius).min(1.0)
            } else {
                1.0
            };
            if aa > 0.0 {
                set_pixel(canvas, cx + x, cy + y, color, aa as f32);
            }
        }
    }
}

/// One pixel wide circle outline just inside `radius`.
fn draw_ring(canvas: &mut Canvas, cx: i32, cy: i32, radius: f64, color: Color) {
    let reach = radius.ceil() as i32 + 1;
    for y in -reach..=reach {
        for x in -reach..=reach {
            let dist = ((x * x + y * y) as f64).sqrt();
            if dist > radius - 1.0 && dist <= radius {
                set_pixel(canvas, cx + x, cy + y, color, 1.0);
            }
        }
    }
}

/// Even-odd scanline fill, sampled at pixel centers.
fn fill_polygon(canvas: &mut Canvas, points: &[(f64, f64)], color: Color) {
    if points.len() < 3 || canvas.width == 0 || canvas.height == 0 {
        return;
    }
    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let first_row = min_y.floor().max(0.0) as i32;
    let last_row = max_y.ceil().min(canvas.height as f64 - 1.0) as i32;

    let last_col = canvas.width as i32 - 1;
    let mut crossings = Vec::with_capacity(points.len());
    for y in first_row..=last_row {
        let sy = y as f64 + 0.5;
        crossings.clear();
        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            if (y0 <= sy) != (y1 <= sy) {
                crossings.push(x0 + (sy - y0) * (x1 - x0) / (y1 - y0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));
        for span in crossings.chunks_exact(2) {
            let start = ((span[0] - 0.5).ceil() as i32).max(0);
            let end = ((span[1] - 0.5).floor() as i32).min(last_col);
            for x in start..=end {
                set_pixel(canvas, x, y, color, 1.0);
            }
        }
    }
}

/// One line of text with the top-left corner of its line box at `(x, y)`.
fn draw_text(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    text: &str,
    font: &Font,
    scale: Scale,
    color: Color,
) {
    let baseline = point(x as f32, y as f32 + font.v_metrics(scale).ascent);
    for glyph in font.layout(text, scale, baseline) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            set_pixel(canvas, bb.min.x + gx as i32, bb.min.y + gy as i32, color, coverage);
        });
    }
}
