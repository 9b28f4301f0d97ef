use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use image::{GrayImage, RgbImage, RgbaImage};
use wide::f32x8;

use crate::{Colorspace, Error, Result, Sample, Vector};

/// 2-D pixel buffer: dimensions, channel count, bit depth, colorspace
/// tag and a flat sample buffer, stored interleaved per pixel in
/// row-major order.
///
/// Invariants, upheld by every constructor and operation:
/// - `data.len() == width * height * channels`
/// - `channels == colorspace.channel_count()`
///
/// Matrices are value types: `Clone` deep-copies the buffer and no two
/// live matrices alias the same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Sample> {
    width: usize,
    height: usize,
    channels: usize,
    bit_depth: u16,
    colorspace: Colorspace,
    data: Vec<T>,
}

impl<T: Sample> Matrix<T> {
    /// Zero-filled matrix with the channel count implied by `colorspace`.
    pub fn new(width: usize, height: usize, colorspace: Colorspace) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(
                "matrix dimensions must be non-zero".into(),
            ));
        }
        let channels = colorspace.channel_count();
        Ok(Self {
            width,
            height,
            channels,
            bit_depth: T::BIT_DEPTH,
            colorspace,
            data: vec![T::default(); width * height * channels],
        })
    }

    /// Wraps a decoder-supplied raw buffer (row-major, channels
    /// interleaved per pixel, no padding).
    pub fn from_raw(
        width: usize,
        height: usize,
        bit_depth: u16,
        colorspace: Colorspace,
        data: Vec<T>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(
                "matrix dimensions must be non-zero".into(),
            ));
        }
        if bit_depth == 0 || bit_depth > T::BIT_DEPTH {
            return Err(Error::InvalidInput(format!(
                "bit depth {} does not fit the sample type ({} bits)",
                bit_depth,
                T::BIT_DEPTH
            )));
        }
        let channels = colorspace.channel_count();
        if data.len() != width * height * channels {
            return Err(Error::DimensionMismatch(format!(
                "buffer holds {} samples, {}x{}x{} needs {}",
                data.len(),
                width,
                height,
                channels,
                width * height * channels
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            bit_depth,
            colorspace,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn colorspace(&self) -> Colorspace {
        self.colorspace
    }

    pub fn same_shape<U: Sample>(&self, other: &Matrix<U>) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Flat sample buffer for the encoder/display boundary.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<T> {
        self.data
    }

    pub fn sample(&self, x: usize, y: usize, channel: usize) -> T {
        self.data[(y * self.width + x) * self.channels + channel]
    }

    pub fn sample_mut(&mut self, x: usize, y: usize, channel: usize) -> &mut T {
        &mut self.data[(y * self.width + x) * self.channels + channel]
    }

    /// All samples of one pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Vector<T> {
        let start = (y * self.width + x) * self.channels;
        Vector::from_slice(&self.data[start..start + self.channels])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: &Vector<T>) {
        assert_eq!(pixel.len(), self.channels, "pixel channel count mismatch");
        let start = (y * self.width + x) * self.channels;
        self.data[start..start + self.channels].copy_from_slice(pixel.as_slice());
    }

    /// Same format, new buffer. The new buffer must have the same length.
    pub fn with_data(&self, data: Vec<T>) -> Self {
        assert_eq!(data.len(), self.data.len(), "buffer length mismatch");
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            bit_depth: self.bit_depth,
            colorspace: self.colorspace,
            data,
        }
    }

    /// Converts every sample, rounding and saturating to the target
    /// sample range (never wrapping).
    ///
    /// The declared bit depth carries through (capped at what the
    /// target type holds), and samples saturate to
    /// `[0, 2^bit_depth - 1]` when the declared depth is narrower
    /// than the target type.
    pub fn convert_samples<U: Sample>(&self) -> Matrix<U> {
        let bit_depth = self.bit_depth.min(U::BIT_DEPTH);
        let ceiling = if bit_depth < U::BIT_DEPTH {
            Some(((1u64 << bit_depth) - 1) as f32)
        } else {
            None
        };
        Matrix {
            width: self.width,
            height: self.height,
            channels: self.channels,
            bit_depth,
            colorspace: self.colorspace,
            data: self
                .data
                .iter()
                .map(|&v| {
                    let mut f = v.to_f32();
                    if let Some(max) = ceiling {
                        f = f.min(max);
                    }
                    U::from_f32(f)
                })
                .collect(),
        }
    }

    pub fn to_f32(&self) -> Matrix<f32> {
        self.convert_samples()
    }
}

impl Matrix<f32> {
    pub fn to_u8(&self) -> Matrix<u8> {
        self.convert_samples()
    }

    pub fn to_u16(&self) -> Matrix<u16> {
        self.convert_samples()
    }

    fn zip_elementwise<FS, F>(&self, other: &Self, simd: FS, scalar: F) -> Result<Self>
    where
        FS: Fn(f32x8, f32x8) -> f32x8,
        F: Fn(f32, f32) -> f32,
    {
        if !self.same_shape(other) {
            return Err(Error::DimensionMismatch(format!(
                "{}x{}x{} vs {}x{}x{}",
                self.width, self.height, self.channels, other.width, other.height, other.channels
            )));
        }

        let a = &self.data;
        let b = &other.data;
        let mut res = vec![0.0f32; a.len()];

        let mut a_chunks = a.chunks_exact(8);
        let mut b_chunks = b.chunks_exact(8);
        let mut res_chunks = res.chunks_exact_mut(8);

        for ((a8, b8), r8) in (&mut a_chunks).zip(&mut b_chunks).zip(&mut res_chunks) {
            let va = f32x8::new(a8.try_into().expect("chunk size guaranteed to be 8"));
            let vb = f32x8::new(b8.try_into().expect("chunk size guaranteed to be 8"));
            r8.copy_from_slice(&<[f32; 8]>::from(simd(va, vb)));
        }

        let rem_a = a_chunks.remainder();
        let rem_b = b_chunks.remainder();
        let rem_res = res_chunks.into_remainder();
        for i in 0..rem_a.len() {
            rem_res[i] = scalar(rem_a[i], rem_b[i]);
        }

        Ok(self.with_data(res))
    }

    /// Elementwise sum of two same-shaped matrices.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.zip_elementwise(other, |a, b| a + b, |a, b| a + b)
    }

    /// Elementwise difference of two same-shaped matrices.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.zip_elementwise(other, |a, b| a - b, |a, b| a - b)
    }

    /// Elementwise product of two same-shaped matrices.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.zip_elementwise(other, |a, b| a * b, |a, b| a * b)
    }

    /// Elementwise quotient. Any zero sample in the divisor is a
    /// precondition failure.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if let Some(index) = other.data.iter().position(|&v| v == 0.0) {
            return Err(Error::ZeroDivisor(index));
        }
        self.zip_elementwise(other, |a, b| a / b, |a, b| a / b)
    }

    /// Checked form of the scalar division operator.
    pub fn div_scalar(&self, rhs: f32) -> Result<Self> {
        if rhs == 0.0 {
            return Err(Error::ZeroScalarDivisor);
        }
        Ok(self / rhs)
    }
}

impl AddAssign<f32> for Matrix<f32> {
    fn add_assign(&mut self, rhs: f32) {
        for v in &mut self.data {
            *v += rhs;
        }
    }
}

impl SubAssign<f32> for Matrix<f32> {
    fn sub_assign(&mut self, rhs: f32) {
        for v in &mut self.data {
            *v -= rhs;
        }
    }
}

impl MulAssign<f32> for Matrix<f32> {
    fn mul_assign(&mut self, rhs: f32) {
        for v in &mut self.data {
            *v *= rhs;
        }
    }
}

impl DivAssign<f32> for Matrix<f32> {
    fn div_assign(&mut self, rhs: f32) {
        assert!(rhs != 0.0, "zero scalar divisor");
        for v in &mut self.data {
            *v /= rhs;
        }
    }
}

impl Add<f32> for &Matrix<f32> {
    type Output = Matrix<f32>;

    fn add(self, rhs: f32) -> Matrix<f32> {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Sub<f32> for &Matrix<f32> {
    type Output = Matrix<f32>;

    fn sub(self, rhs: f32) -> Matrix<f32> {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl Mul<f32> for &Matrix<f32> {
    type Output = Matrix<f32>;

    fn mul(self, rhs: f32) -> Matrix<f32> {
        let mut out = self.clone();
        out *= rhs;
        out
    }
}

impl Div<f32> for &Matrix<f32> {
    type Output = Matrix<f32>;

    fn div(self, rhs: f32) -> Matrix<f32> {
        let mut out = self.clone();
        out /= rhs;
        out
    }
}

impl Matrix<u8> {
    pub fn from_gray_image(img: &GrayImage) -> Result<Self> {
        Self::from_raw(
            img.width() as usize,
            img.height() as usize,
            8,
            Colorspace::Gray,
            img.as_raw().clone(),
        )
    }

    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        Self::from_raw(
            img.width() as usize,
            img.height() as usize,
            8,
            Colorspace::Rgb,
            img.as_raw().clone(),
        )
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Result<Self> {
        Self::from_raw(
            img.width() as usize,
            img.height() as usize,
            8,
            Colorspace::Rgba,
            img.as_raw().clone(),
        )
    }

    pub fn to_gray_image(&self) -> Result<GrayImage> {
        if self.colorspace != Colorspace::Gray {
            return Err(Error::ColorspaceMismatch(format!(
                "expected Gray, got {:?}",
                self.colorspace
            )));
        }
        GrayImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| Error::InvalidInput("buffer does not match dimensions".into()))
    }

    /// HSV matrices export as-is: three interleaved byte channels.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        if !matches!(self.colorspace, Colorspace::Rgb | Colorspace::Hsv) {
            return Err(Error::ColorspaceMismatch(format!(
                "expected Rgb or Hsv, got {:?}",
                self.colorspace
            )));
        }
        RgbImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| Error::InvalidInput("buffer does not match dimensions".into()))
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        if self.colorspace != Colorspace::Rgba {
            return Err(Error::ColorspaceMismatch(format!(
                "expected Rgba, got {:?}",
                self.colorspace
            )));
        }
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| Error::InvalidInput("buffer does not match dimensions".into()))
    }
}
