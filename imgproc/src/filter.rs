use rayon::prelude::*;

use raster_core::{Colorspace, Matrix};

use crate::color::convert;
use crate::convolve::{convolve, convolve_u8, BorderMode, Kernel};
use crate::Result;

/// Convolution-backed filters with fixed kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    GaussianBlur,
    Sharpen,
    EdgeEnhance,
    Emboss,
    Sobel,
}

/// Feature detectors. Output is the grayscale input with detected
/// pixels forced to full intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Harris,
}

const GAUSSIAN_5X5: [f32; 25] = [
    1.0, 4.0, 6.0, 4.0, 1.0, //
    4.0, 16.0, 24.0, 16.0, 4.0, //
    6.0, 24.0, 36.0, 24.0, 6.0, //
    4.0, 16.0, 24.0, 16.0, 4.0, //
    1.0, 4.0, 6.0, 4.0, 1.0,
];

const SHARPEN_3X3: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

const EDGE_ENHANCE_3X3: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

const EMBOSS_3X3: [f32; 9] = [-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0];

const SOBEL_HORIZONTAL_3X3: [f32; 9] = [1.0, 2.0, 1.0, 0.0, 0.0, 0.0, -1.0, -2.0, -1.0];

const SOBEL_VERTICAL_3X3: [f32; 9] = [1.0, 0.0, -1.0, 2.0, 0.0, -2.0, 1.0, 0.0, -1.0];

const HARRIS_K: f32 = 0.04;
const HARRIS_CUTOFF: f32 = 255.0;

/// Applies `kind` to every channel of `input`, saturating the result
/// back to the byte range.
pub fn apply_filter(input: &Matrix<u8>, kind: FilterKind) -> Matrix<u8> {
    let border = BorderMode::Replicate;
    match kind {
        FilterKind::GaussianBlur => {
            let kernel = Kernel::from_slice(&GAUSSIAN_5X5, 5).scaled(1.0 / 256.0);
            convolve_u8(input, &kernel, border)
        }
        FilterKind::Sharpen => convolve_u8(input, &Kernel::from_slice(&SHARPEN_3X3, 3), border),
        FilterKind::EdgeEnhance => {
            convolve_u8(input, &Kernel::from_slice(&EDGE_ENHANCE_3X3, 3), border)
        }
        FilterKind::Emboss => convolve_u8(input, &Kernel::from_slice(&EMBOSS_3X3, 3), border),
        FilterKind::Sobel => {
            let (horizontal, vertical) = sobel_gradients(&input.to_f32());
            sobel_magnitude(&horizontal, &vertical).to_u8()
        }
    }
}

/// Horizontal and vertical Sobel responses, per channel. Flat regions
/// produce zero in both.
pub fn sobel_gradients(input: &Matrix<f32>) -> (Matrix<f32>, Matrix<f32>) {
    let border = BorderMode::Replicate;
    let horizontal = convolve(input, &Kernel::from_slice(&SOBEL_HORIZONTAL_3X3, 3), border);
    let vertical = convolve(input, &Kernel::from_slice(&SOBEL_VERTICAL_3X3, 3), border);
    (horizontal, vertical)
}

/// Euclidean norm of the two gradient responses.
pub fn sobel_magnitude(horizontal: &Matrix<f32>, vertical: &Matrix<f32>) -> Matrix<f32> {
    assert!(
        horizontal.same_shape(vertical),
        "gradient shape mismatch"
    );
    let data: Vec<f32> = horizontal
        .as_slice()
        .par_iter()
        .zip(vertical.as_slice().par_iter())
        .map(|(&h, &v)| (h * h + v * v).sqrt())
        .collect();
    horizontal.with_data(data)
}

pub fn apply_detector(input: &Matrix<u8>, kind: DetectorKind) -> Result<Matrix<u8>> {
    match kind {
        DetectorKind::Harris => harris(input),
    }
}

/// Harris corner response over the grayscale projection of `input`.
///
/// Pixels whose response `det(M) - k * trace(M)^2` exceeds the cutoff
/// are set to full intensity on the grayscale copy; everything else is
/// left as the grayscale value.
pub fn harris(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let mut gray = convert(input, Colorspace::Gray)?;
    let (ix, iy) = sobel_gradients(&gray.to_f32());

    let ixx = ix.mul(&ix)?;
    let iyy = iy.mul(&iy)?;
    let ixy = ix.mul(&iy)?;

    let out = gray.as_mut_slice();
    for (i, ((&xx, &yy), &xy)) in ixx
        .as_slice()
        .iter()
        .zip(iyy.as_slice())
        .zip(ixy.as_slice())
        .enumerate()
    {
        let trace = xx + yy;
        let response = (xx * yy - xy * xy) - HARRIS_K * trace * trace;
        if response > HARRIS_CUTOFF {
            out[i] = u8::MAX;
        }
    }
    Ok(gray)
}
