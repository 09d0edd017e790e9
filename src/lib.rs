//! Persistence-of-vision LED display simulator.
//!
//! A rotating arm carries a row of LEDs. For every LED radius and every
//! discrete arm angle, [`PolarSampler`] averages a small polar patch of a
//! source image into one color. The resulting [`LedColorTable`] is built once
//! and then shown by the [`Presenter`], which only looks colors up.
//!
//! ```no_run
//! use povsim::{LedLayout, Presenter, PresenterConfig, SamplingConfig, SourceImage};
//!
//! # fn main() -> povsim::Result<()> {
//! let config = PresenterConfig::builder().frame_width(600).build();
//! let image = SourceImage::open("images/bird.png", config.frame_width)?;
//! let sampling = SamplingConfig::new(1.0, 3, 10.0, 3)?;
//! let presenter = Presenter::new(image, sampling, LedLayout::default(), config)?;
//! presenter.show()
//! # }
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod color;
pub mod config;
pub mod error;
pub mod presenter;
pub mod render;
pub mod sampler;
pub mod source;
pub mod table;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use color::{Color, LedColor, Rgba};
pub use config::{check_angle_step, LedLayout, PresenterConfig, SamplingConfig, MAX_SWEEP_COLUMNS};
pub use error::{PovError, Result};
pub use presenter::{command_for_key, Presenter, PresenterCommand, ViewState};
pub use render::Canvas;
pub use sampler::{Footprint, Point, PolarSampler};
pub use source::{PixelSource, SourceImage};
pub use table::LedColorTable;
