/// Errors raised while loading inputs or driving the display window.
///
/// Sampling itself never fails; everything here happens before the color
/// table is built or around the presenter's window.
#[derive(Debug, thiserror::Error)]
pub enum PovError {
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not parse font: {0}")]
    Font(String),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("render surface error: {0}")]
    Surface(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, PovError>;
