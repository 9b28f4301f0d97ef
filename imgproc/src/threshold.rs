use raster_core::{Matrix, Sample, Vector};

use crate::{ImgprocError, Result};

fn check_bounds<T: Sample>(
    input: &Matrix<T>,
    lower: &Vector<f32>,
    upper: &Vector<f32>,
) -> Result<()> {
    if lower.len() != input.channels() || upper.len() != input.channels() {
        return Err(ImgprocError::BoundsMismatch(format!(
            "expected {} bound pairs, got {} lower / {} upper",
            input.channels(),
            lower.len(),
            upper.len()
        )));
    }
    Ok(())
}

/// Per-channel binary threshold: samples inside `[lower[c], upper[c]]`
/// become the sample type's maximum, everything else becomes zero.
/// One bound pair per channel, alpha included.
pub fn threshold_binary<T: Sample>(
    input: &Matrix<T>,
    lower: &Vector<f32>,
    upper: &Vector<f32>,
) -> Result<Matrix<T>> {
    check_bounds(input, lower, upper)?;

    let channels = input.channels();
    let mut out = input.clone();
    for (i, sample) in out.as_mut_slice().iter_mut().enumerate() {
        let c = i % channels;
        let v = sample.to_f32();
        *sample = if v >= lower[c] && v <= upper[c] {
            T::MAX
        } else {
            T::default()
        };
    }
    Ok(out)
}

const SUPPRESSED: u8 = 0;
const WEAK: u8 = 1;
const STRONG: u8 = 2;

/// Hysteresis threshold: samples at or above `strong[c]` are kept
/// outright, samples at or above `weak[c]` are kept only when they are
/// 8-connected (within the same channel) to a kept sample, directly or
/// through a chain of weak samples. Kept samples become the sample
/// type's maximum, the rest zero.
///
/// The flood from strong seeds reaches a fixed point, so the result
/// does not depend on traversal order.
pub fn threshold_hysteresis<T: Sample>(
    input: &Matrix<T>,
    weak: &Vector<f32>,
    strong: &Vector<f32>,
) -> Result<Matrix<T>> {
    check_bounds(input, weak, strong)?;

    let width = input.width();
    let height = input.height();
    let channels = input.channels();
    let src = input.as_slice();

    let mut state = vec![SUPPRESSED; src.len()];
    let mut worklist: Vec<(usize, usize, usize)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let i = (y * width + x) * channels + c;
                let v = src[i].to_f32();
                if v >= strong[c] {
                    state[i] = STRONG;
                    worklist.push((x, y, c));
                } else if v >= weak[c] {
                    state[i] = WEAK;
                }
            }
        }
    }

    while let Some((x, y, c)) = worklist.pop() {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                let i = (ny * width + nx) * channels + c;
                if state[i] == WEAK {
                    state[i] = STRONG;
                    worklist.push((nx, ny, c));
                }
            }
        }
    }

    let data = state
        .iter()
        .map(|&s| if s == STRONG { T::MAX } else { T::default() })
        .collect();
    Ok(input.with_data(data))
}
