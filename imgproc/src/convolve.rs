use rayon::prelude::*;

use raster_core::Matrix;

/// Odd-sided square weight matrix for [`convolve`].
#[derive(Debug, Clone)]
pub struct Kernel {
    data: Vec<f32>,
    side: usize,
}

impl Kernel {
    pub fn from_slice(data: &[f32], side: usize) -> Self {
        assert!(side % 2 == 1, "kernel side must be odd");
        assert_eq!(data.len(), side * side, "kernel data length mismatch");
        Self {
            data: data.to_vec(),
            side,
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn radius(&self) -> usize {
        self.side / 2
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.side + x]
    }

    pub fn row(&self, y: usize) -> raster_core::Vector<f32> {
        raster_core::Vector::from_slice(&self.data[y * self.side..(y + 1) * self.side])
    }

    /// New kernel with every weight multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            data: self.data.iter().map(|&v| v * factor).collect(),
            side: self.side,
        }
    }
}

/// How neighborhood samples past the image border are produced.
///
/// `Replicate` (clamp to the nearest edge sample) is the default used
/// by every filter in this crate: it keeps a uniform image uniform
/// under a normalized kernel and keeps gradients zero on flat
/// regions. `Zero` treats out-of-bounds samples as 0. Neither mode
/// reads outside the buffer, and every output pixel is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    Zero,
    #[default]
    Replicate,
}

fn map_coord(coord: isize, len: usize, mode: BorderMode) -> Option<usize> {
    let n = len as isize;
    match mode {
        BorderMode::Zero => {
            if coord < 0 || coord >= n {
                None
            } else {
                Some(coord as usize)
            }
        }
        BorderMode::Replicate => Some(coord.clamp(0, n - 1) as usize),
    }
}

/// Per-channel neighborhood weighted sum.
///
/// The kernel is applied to each channel independently; the output has
/// the same width, height, channel count and colorspace as the input.
/// This is the single primitive behind every filter and detector.
pub fn convolve(input: &Matrix<f32>, kernel: &Kernel, border: BorderMode) -> Matrix<f32> {
    let width = input.width();
    let height = input.height();
    let channels = input.channels();
    let radius = kernel.radius() as isize;
    let src = input.as_slice();
    let row_len = width * channels;

    let mut out = vec![0.0f32; src.len()];
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for ky in 0..kernel.side() {
                        let Some(iy) = map_coord(y as isize + ky as isize - radius, height, border)
                        else {
                            continue;
                        };
                        for kx in 0..kernel.side() {
                            let Some(ix) =
                                map_coord(x as isize + kx as isize - radius, width, border)
                            else {
                                continue;
                            };
                            sum += src[(iy * width + ix) * channels + c] * kernel.get(kx, ky);
                        }
                    }
                    row[x * channels + c] = sum;
                }
            }
        });

    input.with_data(out)
}

/// Integer-depth convenience: computes in `f32` and rounds/saturates
/// back to the byte range.
pub fn convolve_u8(input: &Matrix<u8>, kernel: &Kernel, border: BorderMode) -> Matrix<u8> {
    convolve(&input.to_f32(), kernel, border).to_u8()
}
