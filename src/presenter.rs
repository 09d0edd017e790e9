// ============================================================================
// PRESENTER - table construction and interactive display
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error, info};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::config::{check_angle_step, LedLayout, PresenterConfig, SamplingConfig};
use crate::error::{PovError, Result};
use crate::render::{Canvas, DrawCommand, Scene};
use crate::sampler::{PolarSampler, Point};
use crate::source::{PixelSource, SourceImage};
use crate::table::LedColorTable;

const HUD_MARGIN: i32 = 6;

/// User actions understood by the display loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterCommand {
    RotateLeft,
    RotateRight,
    ToggleRaster,
    ToggleFootprint,
    Quit,
}

impl PresenterCommand {
    pub fn is_rotation(self) -> bool {
        matches!(self, Self::RotateLeft | Self::RotateRight)
    }
}

/// Keyboard binding: arrows rotate and toggle views, Escape or Q quits.
pub fn command_for_key(key: &Key) -> Option<PresenterCommand> {
    match key {
        Key::Named(NamedKey::ArrowLeft) => Some(PresenterCommand::RotateLeft),
        Key::Named(NamedKey::ArrowRight) => Some(PresenterCommand::RotateRight),
        Key::Named(NamedKey::ArrowUp) => Some(PresenterCommand::ToggleRaster),
        Key::Named(NamedKey::ArrowDown) => Some(PresenterCommand::ToggleFootprint),
        Key::Named(NamedKey::Escape) => Some(PresenterCommand::Quit),
        Key::Character(c) if c.eq_ignore_ascii_case("q") => Some(PresenterCommand::Quit),
        _ => None,
    }
}

/// What the display currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Current arm position as a color table column.
    pub column: usize,
    /// Draw every arm position at once (persistence view).
    pub raster: bool,
    pub show_footprint: bool,
    pub running: bool,
}

impl ViewState {
    pub fn new(show_footprint: bool) -> Self {
        Self {
            column: 0,
            raster: false,
            show_footprint,
            running: true,
        }
    }

    /// Apply `command` to a display with `columns` arm positions per revolution.
    pub fn apply(&mut self, command: PresenterCommand, columns: usize) {
        match command {
            PresenterCommand::RotateLeft => self.rotate(1, columns),
            PresenterCommand::RotateRight => self.rotate(-1, columns),
            PresenterCommand::ToggleRaster => self.raster = !self.raster,
            PresenterCommand::ToggleFootprint => self.show_footprint = !self.show_footprint,
            PresenterCommand::Quit => self.running = false,
        }
    }

    fn rotate(&mut self, delta: isize, columns: usize) {
        if columns == 0 {
            return;
        }
        let columns = columns as isize;
        self.column = (self.column as isize + delta).rem_euclid(columns) as usize;
    }
}

/// Owns the precomputed LED colors and draws them.
///
/// The image is sampled once in [`Presenter::new`]; drawing only indexes
/// the table.
pub struct Presenter {
    config: PresenterConfig,
    layout: LedLayout,
    table: LedColorTable,
    /// Footprint corners per LED and table column, in image coordinates.
    outlines: Vec<Vec<[Point; 4]>>,
    image: SourceImage,
    font: Option<Font<'static>>,
}

impl Presenter {
    pub fn new(
        image: SourceImage,
        sampling: SamplingConfig,
        layout: LedLayout,
        config: PresenterConfig,
    ) -> Result<Self> {
        let angle_step = check_angle_step(config.angle_step)?;

        let started = Instant::now();
        let (table, outlines) = {
            let sampler = PolarSampler::new(&image, sampling, config.background_color);
            let table = sampler.build_color_table(&layout, angle_step);
            let outlines: Vec<Vec<[Point; 4]>> = layout
                .radii()
                .map(|radius| {
                    (0..table.angles_per_led())
                        .map(|idx| sampler.footprint_outline(table.angle_of(idx), radius))
                        .collect()
                })
                .collect();
            (table, outlines)
        };
        info!(
            "built color table: {} leds x {} angles ({} points each) in {:?}",
            table.led_count(),
            table.angles_per_led(),
            sampling.points_per_sample(),
            started.elapsed()
        );

        let font = match config.font_data.clone() {
            Some(data) => Some(
                Font::try_from_vec(data)
                    .ok_or_else(|| PovError::Font("unsupported or corrupt font data".into()))?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            layout,
            table,
            outlines,
            image,
            font,
        })
    }

    pub fn table(&self) -> &LedColorTable {
        &self.table
    }

    pub fn layout(&self) -> &LedLayout {
        &self.layout
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Screen position of LED `led` at arm angle `angle` (degrees).
    fn led_center(&self, width: usize, height: usize, led: usize, angle: f64) -> (i32, i32) {
        let (cx, cy) = ((width / 2) as f64, (height / 2) as f64);
        let radius = self.layout.radius_of(led);
        let a = angle.to_radians();
        let x = cx + radius * a.cos();
        let y = height as f64 - (cy + radius * a.sin());
        (x as i32, y as i32)
    }

    /// Top-left corner of the centered background frame.
    fn frame_origin(&self, width: usize, height: usize) -> (i32, i32) {
        let fw = self.config.frame_width as i32;
        (width as i32 / 2 - fw / 2, height as i32 / 2 - fw / 2)
    }

    fn add_led(
        &self,
        scene: &mut Scene,
        width: usize,
        height: usize,
        led: usize,
        column: usize,
        border: bool,
    ) {
        let Some(color) = self.table.color_at(led, column) else {
            return;
        };
        let color = color.to_color();
        let angle = self.table.angle_of(column);
        let (cx, cy) = self.led_center(width, height, led, angle);
        let radius = self.layout.led_radius;
        // Diffuse halo, then the LED body
        scene.add_command(DrawCommand::Disc { cx, cy, radius: radius * 1.10, color });
        scene.add_command(DrawCommand::Disc { cx, cy, radius, color });
        if border {
            scene.add_command(DrawCommand::Ring {
                cx,
                cy,
                radius,
                color: self.config.led_line_color,
            });
        }
    }

    /// Retained description of one frame.
    pub fn scene(&self, width: usize, height: usize, state: &ViewState) -> Scene<'_> {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(self.config.canvas_color));

        let (fx, fy) = self.frame_origin(width, height);
        let fw = self.config.frame_width as i32;
        scene.add_command(DrawCommand::FillRect {
            x: fx,
            y: fy,
            w: fw,
            h: fw,
            color: self.config.background_color,
        });

        let image = self.image.as_rgba();
        let (ix, iy) = (
            width as i32 / 2 - image.width() as i32 / 2,
            height as i32 / 2 - image.height() as i32 / 2,
        );
        scene.add_command(DrawCommand::Image {
            x: ix,
            y: iy,
            image,
            alpha: self.config.image_alpha,
        });
        scene.add_command(DrawCommand::RectOutline {
            x: ix,
            y: iy,
            w: image.width() as i32,
            h: image.height() as i32,
            color: self.config.image_border_color,
        });

        let shaft = DrawCommand::Disc {
            cx: width as i32 / 2,
            cy: height as i32 / 2,
            radius: self.config.shaft_radius as f64,
            color: self.config.shaft_color,
        };

        scene.add_command(shaft);
        if state.raster {
            for column in 0..self.table.angles_per_led() {
                for led in 0..self.layout.led_count {
                    self.add_led(&mut scene, width, height, led, column, false);
                }
            }
        } else {
            for led in 0..self.layout.led_count {
                self.add_led(&mut scene, width, height, led, state.column, true);
            }
            if state.show_footprint {
                for (led, outlines) in self.outlines.iter().enumerate() {
                    let (Some(outline), Some(color)) = (
                        outlines.get(state.column),
                        self.table.color_at(led, state.column),
                    ) else {
                        continue;
                    };
                    let points = outline
                        .iter()
                        .map(|p| (p.x + ix as f64, p.y + iy as f64))
                        .collect();
                    scene.add_command(DrawCommand::Polygon {
                        points,
                        color: color.to_color(),
                    });
                }
            }
        }

        if self.font.is_some() {
            let mode = if state.raster { "raster" } else { "sweep" };
            let overlay = if state.show_footprint && !state.raster {
                " + footprint"
            } else {
                ""
            };
            scene.add_command(DrawCommand::Text {
                x: HUD_MARGIN,
                y: HUD_MARGIN,
                text: format!(
                    "{:.1} deg  {mode}{overlay}",
                    self.table.angle_of(state.column)
                ),
                font_size: self.config.hud_font_size,
                color: self.config.led_line_color,
            });
        }

        scene
    }

    /// Draw one frame for `state` into `canvas`.
    pub fn render(&self, canvas: &mut Canvas, state: &ViewState) {
        let scene = self.scene(canvas.width, canvas.height, state);
        scene.render(canvas, self.font.as_ref());
    }

    /// Open the window and run the display loop until the user quits.
    pub fn show(&self) -> Result<()> {
        let side = self.config.frame_width.max(self.image.width());

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(side as f64, side as f64))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;
        info!("display window {}x{} open", size.width, size.height);

        let columns = self.table.angles_per_led();
        let mut state = ViewState::new(self.config.show_footprint);
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("window closed");
                        window_target.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state != ElementState::Pressed {
                            return;
                        }
                        let Some(command) = command_for_key(&event.logical_key) else {
                            return;
                        };
                        if event.repeat && !command.is_rotation() {
                            return;
                        }
                        state.apply(command, columns);
                        debug!("{command:?} -> {state:?}");
                        if !state.running {
                            window_target.exit();
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        let frame = pixels.frame_mut();
                        let mut canvas = Canvas::new(frame, fb_width, fb_height);
                        self.render(&mut canvas, &state);
                        if let Err(err) = pixels.render() {
                            error!("render failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
