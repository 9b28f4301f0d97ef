use raster_core::{Colorspace, Matrix};

use crate::{ImgprocError, Result};

/// Converts a matrix to `target`, keeping the colorspace tag and
/// channel count consistent.
///
/// Supported primary conversions: alpha insertion/removal within a
/// family, RGB(A) to grayscale (truncating integer mean of the color
/// channels, alpha passed through), RGB(A) to HSV (byte-quantized
/// hue/2, saturation and value) and HSV back to RGB(A). After the
/// primary conversion the alpha channel is added or dropped as needed
/// to reach the requested target. Converting to the current
/// colorspace returns the input unchanged; any other pairing is
/// unsupported and fails without producing a partial result.
pub fn convert(input: &Matrix<u8>, target: Colorspace) -> Result<Matrix<u8>> {
    use Colorspace::*;

    if input.colorspace() == target {
        return Ok(input.clone());
    }

    let primary = match (input.colorspace(), target) {
        (Gray | GrayAlpha, Gray | GrayAlpha) => input.clone(),
        (Rgb | Rgba, Rgb | Rgba) => input.clone(),
        (Rgb | Rgba, Gray | GrayAlpha) => to_grayscale(input)?,
        (Rgb, Hsv) => rgb_to_hsv(input)?,
        (Rgba, Hsv) => rgb_to_hsv(&remove_alpha(input)?)?,
        (Hsv, Rgb | Rgba) => hsv_to_rgb(input)?,
        (source, _) => {
            return Err(ImgprocError::UnsupportedConversion(format!(
                "{source:?} to {target:?}"
            )))
        }
    };

    // Reconcile the channel count with the requested target.
    let out = match (primary.colorspace().has_alpha(), target.has_alpha()) {
        (false, true) => add_alpha(&primary)?,
        (true, false) => remove_alpha(&primary)?,
        _ => primary,
    };

    debug_assert_eq!(out.colorspace(), target);
    Ok(out)
}

fn with_alpha(cs: Colorspace) -> Colorspace {
    match cs {
        Colorspace::Gray => Colorspace::GrayAlpha,
        Colorspace::Rgb => Colorspace::Rgba,
        other => other,
    }
}

fn without_alpha(cs: Colorspace) -> Colorspace {
    match cs {
        Colorspace::GrayAlpha => Colorspace::Gray,
        Colorspace::Rgba => Colorspace::Rgb,
        other => other,
    }
}

/// Appends a fully opaque alpha sample to every pixel.
fn add_alpha(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let channels = input.channels();
    let mut data = Vec::with_capacity(input.width() * input.height() * (channels + 1));
    for px in input.as_slice().chunks_exact(channels) {
        data.extend_from_slice(px);
        data.push(u8::MAX);
    }
    Ok(Matrix::from_raw(
        input.width(),
        input.height(),
        input.bit_depth(),
        with_alpha(input.colorspace()),
        data,
    )?)
}

/// Drops the last channel of every pixel, keeping the rest in order.
fn remove_alpha(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let channels = input.channels();
    let mut data = Vec::with_capacity(input.width() * input.height() * (channels - 1));
    for px in input.as_slice().chunks_exact(channels) {
        data.extend_from_slice(&px[..channels - 1]);
    }
    Ok(Matrix::from_raw(
        input.width(),
        input.height(),
        input.bit_depth(),
        without_alpha(input.colorspace()),
        data,
    )?)
}

/// Luma is the truncating integer mean of the color channels; an alpha
/// channel passes through untouched.
fn to_grayscale(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let channels = input.channels();
    let alpha = input.colorspace().has_alpha();
    let stride = channels - usize::from(alpha);
    let target = if alpha {
        Colorspace::GrayAlpha
    } else {
        Colorspace::Gray
    };

    let mut data = Vec::with_capacity(input.width() * input.height() * target.channel_count());
    for px in input.as_slice().chunks_exact(channels) {
        let sum: u32 = px[..stride].iter().map(|&v| u32::from(v)).sum();
        data.push((sum / stride as u32) as u8);
        if alpha {
            data.push(px[stride]);
        }
    }
    Ok(Matrix::from_raw(
        input.width(),
        input.height(),
        input.bit_depth(),
        target,
        data,
    )?)
}

/// Standard RGB-to-HSV, stored byte-quantized: hue in [0,360) halved,
/// saturation and value scaled to [0,255].
fn rgb_to_hsv(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let mut data = Vec::with_capacity(input.as_slice().len());
    for px in input.as_slice().chunks_exact(3) {
        let red = px[0] as f32 / 255.0;
        let green = px[1] as f32 / 255.0;
        let blue = px[2] as f32 / 255.0;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let delta = max - min;

        let hue = if delta == 0.0 {
            0.0
        } else if max == red {
            let h = 60.0 * (green - blue) / delta;
            if h < 0.0 {
                h + 360.0
            } else {
                h
            }
        } else if max == green {
            120.0 + 60.0 * (blue - red) / delta
        } else {
            240.0 + 60.0 * (red - green) / delta
        };

        data.push((hue / 2.0) as u8);
        data.push(if max == 0.0 {
            0
        } else {
            (delta / max * 255.0) as u8
        });
        data.push((max * 255.0) as u8);
    }
    Ok(Matrix::from_raw(
        input.width(),
        input.height(),
        input.bit_depth(),
        Colorspace::Hsv,
        data,
    )?)
}

/// Sector-based reconstruction from the byte-quantized samples.
fn hsv_to_rgb(input: &Matrix<u8>) -> Result<Matrix<u8>> {
    let mut data = Vec::with_capacity(input.as_slice().len());
    for px in input.as_slice().chunks_exact(3) {
        let hue = px[0] as f32 * 2.0;
        let saturation = px[1] as f32 / 255.0;
        let value = px[2] as f32 / 255.0;

        let chroma = value * saturation;
        let sector = hue / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match sector as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let m = value - chroma;
        data.push(((r1 + m) * 255.0).round() as u8);
        data.push(((g1 + m) * 255.0).round() as u8);
        data.push(((b1 + m) * 255.0).round() as u8);
    }
    Ok(Matrix::from_raw(
        input.width(),
        input.height(),
        input.bit_depth(),
        Colorspace::Rgb,
        data,
    )?)
}
