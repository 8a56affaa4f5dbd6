//! Integration tests for Pipeline file runs and filter properties.

use hwpipe_core::{FrameBuffer, Pixel};
use hwpipe_ops::color::{convert_to_grayscale, luminance};
use hwpipe_ops::{
    ConvolutionFilter, EdgeFilter, Filter, Kernel, NumericMode, Pipeline, PipelineConfig,
    SmoothingFilter,
};
use tempfile::tempdir;

/// Pseudo-random colour frame, deterministic.
fn noise(width: u32, height: u32, seed: u32) -> FrameBuffer<'static> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let pixels = (0..width * height)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Pixel::new(r, g, b)
        })
        .collect();
    FrameBuffer::from_pixels(width, height, pixels).unwrap()
}

fn all_filters() -> Vec<Box<dyn Filter>> {
    vec![
        Box::new(SmoothingFilter),
        Box::new(EdgeFilter),
        Box::new(ConvolutionFilter::gaussian(5, 1.0).unwrap()),
        Box::new(ConvolutionFilter::sharpen().with_mode(NumericMode::Fixed)),
        Box::new(ConvolutionFilter::new(Kernel::box_blur(7).unwrap())),
    ]
}

#[test]
fn every_filter_preserves_dimensions() {
    for (w, h) in [(3, 3), (4, 9), (17, 5), (32, 32)] {
        let input = noise(w, h, w * 31 + h);
        for filter in all_filters() {
            let mut output = FrameBuffer::new(w, h).unwrap();
            filter.apply(&input, &mut output).unwrap();
            assert_eq!(output.dimensions(), (w, h), "{} on {w}x{h}", filter.name());
        }
    }
}

#[test]
fn edge_border_always_black() {
    for seed in 1..6 {
        let input = noise(9, 7, seed);
        let mut output = FrameBuffer::from_pixels(9, 7, vec![Pixel::WHITE; 63]).unwrap();
        EdgeFilter.apply(&input, &mut output).unwrap();
        for x in 0..9 {
            assert_eq!(output.pixel(x, 0).unwrap(), Pixel::BLACK);
            assert_eq!(output.pixel(x, 6).unwrap(), Pixel::BLACK);
        }
        for y in 0..7 {
            assert_eq!(output.pixel(0, y).unwrap(), Pixel::BLACK);
            assert_eq!(output.pixel(8, y).unwrap(), Pixel::BLACK);
        }
    }
}

#[test]
fn grayscale_idempotent_on_noise() {
    let mut once = noise(20, 20, 7);
    convert_to_grayscale(&mut once);
    let mut twice = once.try_clone_owned().unwrap();
    convert_to_grayscale(&mut twice);
    assert_eq!(once.pixels(), twice.pixels());
}

#[test]
fn zero_stage_run_writes_grayscale() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("in.ppm");
    let output_path = dir.path().join("out.ppm");

    let input = noise(6, 5, 3);
    let expected: Vec<Pixel> = input.pixels().iter().map(|p| Pixel::gray(luminance(*p))).collect();
    hwpipe_io::write(&input_path, &input).unwrap();

    let mut pipeline = Pipeline::new();
    assert!(pipeline.run(&input_path, &output_path));

    let output = hwpipe_io::read(&output_path).unwrap();
    assert_eq!(output.pixels(), expected.as_slice());
}

#[test]
fn basic_preset_on_white_square() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("square.ppm");
    let output_path = dir.path().join("edges.ppm");

    // White 4x4 block centred in 8x8 black
    let pixels = (0..64)
        .map(|i| {
            let (x, y) = (i % 8, i / 8);
            if (2..6).contains(&x) && (2..6).contains(&y) { Pixel::WHITE } else { Pixel::BLACK }
        })
        .collect();
    hwpipe_io::write(&input_path, &FrameBuffer::from_pixels(8, 8, pixels).unwrap()).unwrap();

    let mut pipeline = PipelineConfig::basic().build_pipeline().unwrap();
    assert!(pipeline.run(&input_path, &output_path));

    let output = hwpipe_io::read(&output_path).unwrap();
    assert!(output.pixels().iter().all(|p| p.is_gray()));
    // Flat interior of the block has no gradient, its outline does
    assert_eq!(output.pixel(0, 0).unwrap(), Pixel::BLACK);
    assert!(output.pixel(2, 3).unwrap().r > 0);
}

#[test]
fn conv_preset_fixed_close_to_float() {
    let input = noise(24, 24, 11);
    let mut float = PipelineConfig::conv().build_pipeline().unwrap();
    let mut fixed = PipelineConfig::conv()
        .with_numeric(NumericMode::Fixed)
        .build_pipeline()
        .unwrap();

    let a = float.process(input.try_clone_owned().unwrap()).unwrap();
    let b = fixed.process(input).unwrap();

    // Two quantized stages; sharpen amplifies gaussian drift by up to 9x
    let max_diff = a
        .pixels()
        .iter()
        .zip(b.pixels())
        .map(|(p, q)| (p.r as i32 - q.r as i32).abs())
        .max()
        .unwrap_or(0);
    assert!(max_diff <= 32, "max channel drift {max_diff}");
}

#[test]
fn failed_decode_writes_nothing() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("bad.ppm");
    let output_path = dir.path().join("out.ppm");
    std::fs::write(&input_path, "P3\n4 4\n255\n1 2 3\n").unwrap();

    let mut pipeline = PipelineConfig::basic().build_pipeline().unwrap();
    assert!(!pipeline.run(&input_path, &output_path));
    assert!(!output_path.exists());
    assert!(pipeline.try_run(&input_path, &output_path).is_err());
}

#[test]
fn yaml_config_from_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("pipeline.yaml");
    std::fs::write(
        &config_path,
        "numeric: fixed\nstages:\n  - filter: box\n    size: 5\n  - filter: named\n    name: edge\n",
    )
    .unwrap();

    let config = PipelineConfig::from_file(&config_path).unwrap();
    assert_eq!(config.numeric, NumericMode::Fixed);
    let pipeline = config.build_pipeline().unwrap();
    assert_eq!(pipeline.stage_names(), vec!["convolution", "edge"]);

    assert!(PipelineConfig::from_file(dir.path().join("missing.yaml")).is_err());
}
