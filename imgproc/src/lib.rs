pub mod color;
pub mod convolve;
pub mod filter;
pub mod threshold;

pub use color::*;
pub use convolve::*;
pub use filter::*;
pub use threshold::*;

pub type Result<T> = std::result::Result<T, ImgprocError>;

#[derive(Debug, thiserror::Error)]
pub enum ImgprocError {
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),

    #[error("Threshold bounds mismatch: {0}")]
    BoundsMismatch(String),

    #[error("Core error: {0}")]
    Core(#[from] raster_core::Error),
}
