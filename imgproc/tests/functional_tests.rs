use raster_core::{Colorspace, Matrix, Vector};
use raster_imgproc::{
    apply_detector, apply_filter, convert, convolve, threshold_binary, threshold_hysteresis,
    BorderMode, DetectorKind, FilterKind, ImgprocError, Kernel,
};

fn uniform(width: usize, height: usize, cs: Colorspace, value: u8) -> Matrix<u8> {
    let data = vec![value; width * height * cs.channel_count()];
    Matrix::from_raw(width, height, 8, cs, data).unwrap()
}

#[test]
fn convolution_preserves_shape_for_all_layouts() {
    for cs in [
        Colorspace::Gray,
        Colorspace::GrayAlpha,
        Colorspace::Rgb,
        Colorspace::Rgba,
    ] {
        let input = uniform(9, 6, cs, 33).to_f32();
        let kernel = Kernel::from_slice(&[0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0], 3);
        let out = convolve(&input, &kernel, BorderMode::default());
        assert_eq!(out.width(), 9);
        assert_eq!(out.height(), 6);
        assert_eq!(out.channels(), cs.channel_count());
        assert_eq!(out.colorspace(), cs);
    }
}

#[test]
fn border_modes_differ_only_at_the_border() {
    let input = uniform(5, 5, Colorspace::Gray, 100).to_f32();
    let kernel = Kernel::from_slice(&[1.0; 9], 3).scaled(1.0 / 9.0);
    let zero = convolve(&input, &kernel, BorderMode::Zero);
    let replicate = convolve(&input, &kernel, BorderMode::Replicate);

    assert_eq!(zero.sample(2, 2, 0), replicate.sample(2, 2, 0));
    assert!(zero.sample(0, 0, 0) < replicate.sample(0, 0, 0));
    assert!(replicate.as_slice().iter().all(|&v| (v - 100.0).abs() < 1e-3));
}

#[test]
fn rgb_hsv_round_trip_on_pure_colors() {
    for px in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 255]] {
        let mat = Matrix::from_raw(1, 1, 8, Colorspace::Rgb, px.to_vec()).unwrap();
        let hsv = convert(&mat, Colorspace::Hsv).unwrap();
        let back = convert(&hsv, Colorspace::Rgb).unwrap();
        for (a, b) in back.as_slice().iter().zip(px.iter()) {
            assert!(a.abs_diff(*b) <= 2, "{px:?} came back as {:?}", back.as_slice());
        }
    }
}

#[test]
fn rgb_rgba_round_trip_is_exact() {
    let data: Vec<u8> = (0..4 * 3 * 3).collect();
    let mat = Matrix::from_raw(4, 3, 8, Colorspace::Rgb, data).unwrap();
    let rgba = convert(&mat, Colorspace::Rgba).unwrap();
    assert!(rgba.as_slice().iter().skip(3).step_by(4).all(|&a| a == 255));
    assert_eq!(convert(&rgba, Colorspace::Rgb).unwrap(), mat);
}

#[test]
fn grayscale_conversion_averages_channels() {
    let mat = Matrix::from_raw(1, 1, 8, Colorspace::Rgb, vec![30, 60, 90]).unwrap();
    assert_eq!(convert(&mat, Colorspace::Gray).unwrap().as_slice(), &[60]);
}

#[test]
fn conversion_failure_produces_no_partial_result() {
    let gray = uniform(2, 2, Colorspace::Gray, 10);
    match convert(&gray, Colorspace::Hsv) {
        Err(ImgprocError::UnsupportedConversion(msg)) => {
            assert!(msg.contains("Gray"));
            assert!(msg.contains("Hsv"));
        }
        other => panic!("expected unsupported conversion, got {other:?}"),
    }
}

#[test]
fn blur_of_uniform_image_is_identity() {
    let input = uniform(10, 10, Colorspace::Rgba, 77);
    let out = apply_filter(&input, FilterKind::GaussianBlur);
    assert_eq!(out.as_slice(), input.as_slice());
}

#[test]
fn emboss_output_stays_in_byte_range() {
    let mut input = uniform(8, 8, Colorspace::Gray, 0);
    for y in 0..8 {
        for x in 0..8 {
            *input.sample_mut(x, y, 0) = ((x * 31 + y * 17) % 256) as u8;
        }
    }
    // Saturating conversion back to u8 cannot wrap, whatever the
    // kernel produces.
    let out = apply_filter(&input, FilterKind::Emboss);
    assert_eq!(out.as_slice().len(), input.as_slice().len());
}

#[test]
fn sobel_responds_to_edges_not_flats() {
    let mut input = uniform(8, 8, Colorspace::Gray, 50);
    for y in 0..8 {
        for x in 4..8 {
            *input.sample_mut(x, y, 0) = 200;
        }
    }
    let out = apply_filter(&input, FilterKind::Sobel);
    assert_eq!(out.sample(0, 4, 0), 0);
    assert!(out.sample(3, 4, 0) > 0);
    assert!(out.sample(4, 4, 0) > 0);
}

#[test]
fn harris_leaves_flat_color_image_as_grayscale() {
    let input = uniform(10, 10, Colorspace::Rgb, 90);
    let out = apply_detector(&input, DetectorKind::Harris).unwrap();
    assert_eq!(out.colorspace(), Colorspace::Gray);
    assert!(out.as_slice().iter().all(|&v| v == 90));
}

#[test]
fn binary_threshold_is_inclusive_on_both_bounds() {
    let input = Matrix::from_raw(4, 1, 8, Colorspace::Gray, vec![49u8, 50, 150, 151]).unwrap();
    let out = threshold_binary(
        &input,
        &Vector::from_slice(&[50.0]),
        &Vector::from_slice(&[150.0]),
    )
    .unwrap();
    assert_eq!(out.as_slice(), &[0, 255, 255, 0]);
}

#[test]
fn hysteresis_keeps_connected_weak_samples_only() {
    // Row 0: strong seed then a weak run. Row 1: an isolated weak
    // sample with no strong neighbor anywhere around it.
    let data = vec![
        160u8, 100, 100, 0, 0, //
        0, 0, 0, 0, 100,
    ];
    let input = Matrix::from_raw(5, 2, 8, Colorspace::Gray, data).unwrap();
    let out = threshold_hysteresis(
        &input,
        &Vector::from_slice(&[80.0]),
        &Vector::from_slice(&[150.0]),
    )
    .unwrap();
    assert_eq!(
        out.as_slice(),
        &[255, 255, 255, 0, 0, 0, 0, 0, 0, 0]
    );
}

#[test]
fn hsv_value_channel_thresholds_after_conversion() {
    // Pipeline: RGB to HSV, then keep only high-value pixels.
    let data = vec![
        200, 10, 10, // bright red
        20, 20, 20, // dark gray
    ];
    let rgb = Matrix::from_raw(2, 1, 8, Colorspace::Rgb, data).unwrap();
    let hsv = convert(&rgb, Colorspace::Hsv).unwrap();
    let out = threshold_binary(
        &hsv,
        &Vector::from_slice(&[0.0, 0.0, 128.0]),
        &Vector::from_slice(&[255.0, 255.0, 255.0]),
    )
    .unwrap();
    assert_eq!(out.sample(0, 0, 2), 255);
    assert_eq!(out.sample(1, 0, 2), 0);
}

#[test]
fn u16_matrices_threshold_with_native_maximum() {
    let input =
        Matrix::from_raw(3, 1, 16, Colorspace::Gray, vec![100u16, 40_000, 65_535]).unwrap();
    let out = threshold_binary(
        &input,
        &Vector::from_slice(&[30_000.0]),
        &Vector::from_slice(&[65_535.0]),
    )
    .unwrap();
    assert_eq!(out.as_slice(), &[0, 65_535, 65_535]);
}
