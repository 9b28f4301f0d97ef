pub mod colorspace;
pub mod matrix;
pub mod sample;
pub mod vector;

pub use colorspace::*;
pub use matrix::*;
pub use sample::*;
pub use vector::*;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Colorspace mismatch: {0}")]
    ColorspaceMismatch(String),

    #[error("Matrix divisor contains a zero sample (index {0})")]
    ZeroDivisor(usize),

    #[error("Scalar divisor is zero")]
    ZeroScalarDivisor,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
