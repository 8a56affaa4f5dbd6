//! Integration tests for hwpipe crates.
//!
//! This crate contains end-to-end tests that drive images from disk
//! through the filter pipeline and back.

#[cfg(test)]
mod tests {
    use hwpipe_core::{FrameBuffer, Pixel};
    use hwpipe_ops::{
        EdgeFilter, Filter, NumericMode, Pipeline, PipelineConfig, SmoothingFilter, StageEvent,
        StagePhase,
    };
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::tempdir;

    /// 5x5 black frame with a single white pixel in the centre.
    fn center_dot() -> FrameBuffer<'static> {
        let mut frame = FrameBuffer::new(5, 5).unwrap();
        frame.set_pixel(2, 2, Pixel::WHITE).unwrap();
        frame
    }

    /// Test full image processing pipeline: load -> smooth -> save
    #[test]
    fn test_white_frame_through_smoothing() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("white.ppm");
        let output_path = dir.path().join("smoothed.ppm");

        let white = FrameBuffer::from_pixels(5, 5, vec![Pixel::WHITE; 25]).unwrap();
        hwpipe_io::write(&input_path, &white).unwrap();

        let mut pipeline = Pipeline::new();
        pipeline.add_stage(Box::new(SmoothingFilter));
        assert!(pipeline.run(&input_path, &output_path));

        let loaded = hwpipe_io::read(&output_path).unwrap();
        assert_eq!(loaded.dimensions(), (5, 5));
        assert!(loaded.pixels().iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn test_center_dot_through_edge() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("dot.ppm");
        let output_path = dir.path().join("edges.pgm");
        hwpipe_io::write(&input_path, &center_dot()).unwrap();

        let mut pipeline = Pipeline::new();
        assert!(pipeline.add_stage_by_name("edge"));
        assert!(pipeline.run(&input_path, &output_path));

        // PGM output still loads as r = g = b
        let loaded = hwpipe_io::read(&output_path).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                let v = loaded.pixel(x, y).unwrap().r;
                let ring = (1..=3).contains(&x) && (1..=3).contains(&y) && (x, y) != (2, 2);
                assert_eq!(v > 0, ring, "({x}, {y}) = {v}");
            }
        }
    }

    #[test]
    fn test_degenerate_2x2() {
        let frame = FrameBuffer::from_pixels(
            2,
            2,
            vec![Pixel::gray(10), Pixel::gray(20), Pixel::gray(30), Pixel::gray(40)],
        )
        .unwrap();

        let mut smoothed = FrameBuffer::new(2, 2).unwrap();
        SmoothingFilter.apply(&frame, &mut smoothed).unwrap();
        assert_eq!(smoothed.pixels(), frame.pixels());

        let mut edges = FrameBuffer::new(2, 2).unwrap();
        EdgeFilter.apply(&frame, &mut edges).unwrap();
        assert!(edges.pixels().iter().all(|p| *p == Pixel::BLACK));

        // Whole pipeline on a 2x2 file: smooth copies, edge blackens
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("tiny.ppm");
        let output_path = dir.path().join("tiny_out.ppm");
        hwpipe_io::write(&input_path, &frame).unwrap();
        let mut pipeline = PipelineConfig::basic().build_pipeline().unwrap();
        assert!(pipeline.run(&input_path, &output_path));
        let loaded = hwpipe_io::read(&output_path).unwrap();
        assert!(loaded.pixels().iter().all(|p| *p == Pixel::BLACK));
    }

    #[test]
    fn test_comments_and_small_maxval_input() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("commented.ppm");
        let output_path = dir.path().join("gray.ppm");
        std::fs::write(
            &input_path,
            "P3\n# made by hand\n2 1\n15\n15 15 15 # white\n0 0 0\n",
        )
        .unwrap();

        let mut pipeline = Pipeline::new();
        assert!(pipeline.run(&input_path, &output_path));

        let text = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n255 255 255\n0 0 0\n");
    }

    #[test]
    fn test_yaml_pipeline_with_callback() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("pipeline.yaml");
        let input_path = dir.path().join("in.ppm");
        let output_path = dir.path().join("out.ppm");

        std::fs::write(
            &config_path,
            "numeric: fixed\nstages:\n  - filter: gaussian\n    size: 3\n    sigma: 0.8\n  - filter: sharpen\n  - filter: named\n    name: edge\n",
        )
        .unwrap();
        hwpipe_io::write(&input_path, &center_dot()).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut pipeline = PipelineConfig::from_file(&config_path)
            .unwrap()
            .build_pipeline()
            .unwrap();
        pipeline.set_stage_callback(move |e: &StageEvent<'_>| {
            if e.phase == StagePhase::After {
                sink.borrow_mut().push(format!("{}:{}", e.index, e.name));
            }
        });

        assert!(pipeline.run(&input_path, &output_path));
        assert_eq!(*log.borrow(), vec!["0:convolution", "1:convolution", "2:edge"]);

        // Callback removal leaves the run untouched
        pipeline.clear_stage_callback();
        assert!(pipeline.run(&input_path, &output_path));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_fixed_and_float_agree_on_smooth_edge() {
        // Smoothing and edge use integer arithmetic in both modes
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("in.ppm");
        let pixels = (0..12 * 10)
            .map(|i: u32| Pixel::new((i * 37 % 256) as u8, (i * 11 % 256) as u8, (i % 256) as u8))
            .collect();
        hwpipe_io::write(&input_path, &FrameBuffer::from_pixels(12, 10, pixels).unwrap()).unwrap();

        let mut outputs = Vec::new();
        for mode in [NumericMode::Float, NumericMode::Fixed] {
            let output_path = dir.path().join(format!("out_{mode}.ppm"));
            let mut pipeline = PipelineConfig::basic().with_numeric(mode).build_pipeline().unwrap();
            assert!(pipeline.run(&input_path, &output_path));
            outputs.push(std::fs::read_to_string(&output_path).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn test_unwritable_output_fails() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("in.ppm");
        hwpipe_io::write(&input_path, &center_dot()).unwrap();

        let mut pipeline = Pipeline::new();
        let output_path = dir.path().join("no_such_dir").join("out.ppm");
        assert!(!pipeline.run(&input_path, &output_path));
    }

    #[test]
    fn test_unsupported_binary_input() {
        let dir = tempdir().unwrap();
        let input_path = dir.path().join("binary.ppm");
        let output_path = dir.path().join("out.ppm");
        std::fs::write(&input_path, b"P6\n1 1\n255\n\xff\x00\x00").unwrap();

        let mut pipeline = PipelineConfig::basic().build_pipeline().unwrap();
        assert!(!pipeline.run(&input_path, &output_path));
        assert!(!output_path.exists());
    }
}
