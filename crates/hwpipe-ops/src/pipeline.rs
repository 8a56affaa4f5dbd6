//! Ordered filter sequencing over a pair of alternating buffers.
//!
//! A run decodes the source, reduces it to grayscale once, then feeds it
//! through every stage. Stages read the current buffer and write the other
//! one; afterwards the roles swap by flipping an index, so no stage ever
//! allocates. The buffer holding the last stage's output is encoded.
//!
//! ```text
//!  decode -> grayscale -> [A] -stage0-> [B] -stage1-> [A] ... -> encode
//! ```
//!
//! With no stages the grayscale image is written unchanged.
//!
//! # Example
//!
//! ```rust
//! use hwpipe_core::{FrameBuffer, Pixel};
//! use hwpipe_ops::Pipeline;
//!
//! let mut pipeline = Pipeline::new();
//! assert!(pipeline.add_stage_by_name("smooth"));
//! assert!(pipeline.add_stage_by_name("edge"));
//! assert!(!pipeline.add_stage_by_name("emboss"));
//!
//! let frame = FrameBuffer::from_pixels(5, 5, vec![Pixel::WHITE; 25]).unwrap();
//! let out = pipeline.process(frame).unwrap();
//! // Flat field has no edges
//! assert!(out.pixels().iter().all(|p| *p == Pixel::BLACK));
//! ```

use crate::color::convert_to_grayscale;
use crate::{Filter, FilterRegistry, NumericMode, OpsResult};
use hwpipe_core::FrameBuffer;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// When a stage callback fires relative to its stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    /// Before `apply`.
    Before,
    /// After `apply` succeeded.
    After,
}

/// Notification passed to the stage callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageEvent<'a> {
    /// Zero-based position in the pipeline.
    pub index: usize,
    /// The stage's [`Filter::name`].
    pub name: &'a str,
    /// Before or after the stage ran.
    pub phase: StagePhase,
}

type StageCallback = Box<dyn FnMut(&StageEvent<'_>)>;

/// Two equally sized buffers and the index of the one holding current data.
struct PingPong {
    buffers: [FrameBuffer<'static>; 2],
    current: usize,
}

impl PingPong {
    /// Takes `first` as the current buffer and allocates its partner.
    fn new(first: FrameBuffer<'static>) -> OpsResult<Self> {
        let (width, height) = first.dimensions();
        let second = FrameBuffer::new(width, height)?;
        Ok(Self {
            buffers: [first, second],
            current: 0,
        })
    }

    /// `(read, write)` views.
    fn split(&mut self) -> (&FrameBuffer<'static>, &mut FrameBuffer<'static>) {
        let [a, b] = &mut self.buffers;
        if self.current == 0 { (&*a, b) } else { (&*b, a) }
    }

    fn swap(&mut self) {
        self.current ^= 1;
    }

    fn into_current(self) -> FrameBuffer<'static> {
        let [a, b] = self.buffers;
        if self.current == 0 { a } else { b }
    }
}

/// Ordered sequence of exclusively owned filters.
pub struct Pipeline {
    stages: Vec<Box<dyn Filter>>,
    registry: FilterRegistry,
    callback: Option<StageCallback>,
}

impl Pipeline {
    /// Empty pipeline with the built-in float-mode registry.
    pub fn new() -> Self {
        Self::with_registry(FilterRegistry::with_builtins(NumericMode::Float))
    }

    /// Empty pipeline whose built-in convolution stages use `mode`.
    pub fn with_numeric_mode(mode: NumericMode) -> Self {
        Self::with_registry(FilterRegistry::with_builtins(mode))
    }

    /// Empty pipeline resolving names through `registry`.
    pub fn with_registry(registry: FilterRegistry) -> Self {
        Self {
            stages: Vec::new(),
            registry,
            callback: None,
        }
    }

    /// Appends a stage.
    pub fn add_stage(&mut self, filter: Box<dyn Filter>) {
        debug!(index = self.stages.len(), stage = filter.name(), "stage added");
        self.stages.push(filter);
    }

    /// Appends a stage built from the registry.
    ///
    /// Returns `false` (and logs a warning) if `name` is not registered.
    pub fn add_stage_by_name(&mut self, name: &str) -> bool {
        match self.registry.instantiate(name) {
            Some(filter) => {
                self.add_stage(filter);
                true
            }
            None => {
                warn!(name, "unknown filter, stage not added");
                false
            }
        }
    }

    /// Registers a named constructor, replacing any existing one.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Filter> + 'static,
    {
        self.registry.register(name, factory);
    }

    /// Names available to [`Self::add_stage_by_name`], sorted.
    pub fn registered_filters(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// The registry used for name lookups.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Removes every stage.
    pub fn clear_stages(&mut self) {
        self.stages.clear();
    }

    /// Installs a callback fired before and after each stage.
    ///
    /// A panicking callback is caught and logged; the run continues.
    pub fn set_stage_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&StageEvent<'_>) + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Removes the stage callback.
    pub fn clear_stage_callback(&mut self) {
        self.callback = None;
    }

    fn notify(&mut self, event: StageEvent<'_>) {
        let Some(callback) = self.callback.as_mut() else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
            warn!(index = event.index, stage = event.name, "stage callback panicked");
        }
    }

    /// Grayscale-converts `frame` and runs every stage over it.
    ///
    /// # Errors
    ///
    /// Fails if the second working buffer cannot be allocated or a stage
    /// fails. Both working buffers are released on every path.
    pub fn process(&mut self, mut frame: FrameBuffer<'static>) -> OpsResult<FrameBuffer<'static>> {
        convert_to_grayscale(&mut frame);
        if self.stages.is_empty() {
            debug!("no stages, grayscale only");
            return Ok(frame);
        }

        let mut buffers = PingPong::new(frame)?;
        let stages = std::mem::take(&mut self.stages);
        let result = self.run_stages(&stages, &mut buffers);
        self.stages = stages;
        result?;

        trace!(current = buffers.current, "final buffer");
        Ok(buffers.into_current())
    }

    fn run_stages(&mut self, stages: &[Box<dyn Filter>], buffers: &mut PingPong) -> OpsResult<()> {
        for (index, stage) in stages.iter().enumerate() {
            let name = stage.name();
            self.notify(StageEvent { index, name, phase: StagePhase::Before });

            let start = Instant::now();
            let (read, write) = buffers.split();
            stage.apply(read, write)?;
            buffers.swap();
            debug!(index, stage = name, elapsed_us = start.elapsed().as_micros() as u64, "stage done");

            self.notify(StageEvent { index, name, phase: StagePhase::After });
        }
        Ok(())
    }

    /// Decodes `input`, processes it, and encodes the result to `output`.
    ///
    /// Nothing is written if decoding or any stage fails.
    pub fn try_run(&mut self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> OpsResult<()> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let frame = hwpipe_io::read(input)?;
        let (width, height) = frame.dimensions();
        info!(input = %input.display(), width, height, stages = self.stages.len(), "pipeline start");

        let result = self.process(frame)?;
        hwpipe_io::write(output, &result)?;
        info!(output = %output.display(), "pipeline done");
        Ok(())
    }

    /// [`Self::try_run`] collapsed to a status: `true` on success.
    ///
    /// Failures are logged, never raised.
    pub fn run(&mut self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> bool {
        let input = input.as_ref();
        match self.try_run(input, output) {
            Ok(()) => true,
            Err(e) => {
                error!(input = %input.display(), "pipeline failed: {e}");
                false
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .field("registry", &self.registry)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::luminance;
    use crate::{EdgeFilter, OpsError, SmoothingFilter};
    use hwpipe_core::Pixel;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn colorful(w: u32, h: u32) -> FrameBuffer<'static> {
        let pixels = (0..w * h)
            .map(|i| Pixel::new((i * 31 % 256) as u8, (i * 17 % 256) as u8, (i * 5 % 256) as u8))
            .collect();
        FrameBuffer::from_pixels(w, h, pixels).unwrap()
    }

    /// Adds a constant to the red channel so stage order is observable.
    struct AddRed(u8);

    impl Filter for AddRed {
        fn name(&self) -> &str {
            "add_red"
        }

        fn apply(&self, input: &FrameBuffer<'_>, output: &mut FrameBuffer<'_>) -> OpsResult<()> {
            crate::filter::ensure_same_size(input, output)?;
            for (o, i) in output.pixels_mut().iter_mut().zip(input.pixels()) {
                *o = Pixel::new(i.r.saturating_add(self.0), i.g, i.b);
            }
            Ok(())
        }
    }

    struct Failing;

    impl Filter for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn apply(&self, _: &FrameBuffer<'_>, _: &mut FrameBuffer<'_>) -> OpsResult<()> {
            Err(OpsError::InvalidParameter("boom".into()))
        }
    }

    #[test]
    fn test_zero_stages_is_grayscale() {
        let input = colorful(6, 4);
        let expected: Vec<Pixel> = input.pixels().iter().map(|p| Pixel::gray(luminance(*p))).collect();
        let mut pipeline = Pipeline::new();
        let out = pipeline.process(input).unwrap();
        assert_eq!(out.pixels(), expected.as_slice());
    }

    #[test]
    fn test_parity_of_stage_count() {
        // Odd and even stage counts both return the last stage's output
        for n in 1..=4u8 {
            let mut pipeline = Pipeline::new();
            for _ in 0..n {
                pipeline.add_stage(Box::new(AddRed(1)));
            }
            let input = FrameBuffer::from_pixels(3, 3, vec![Pixel::gray(100); 9]).unwrap();
            let out = pipeline.process(input).unwrap();
            assert_eq!(out.pixels()[0], Pixel::new(100 + n, 100, 100), "{n} stages");
        }
    }

    #[test]
    fn test_stage_order_and_names() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(Box::new(SmoothingFilter));
        pipeline.add_stage(Box::new(EdgeFilter));
        assert!(pipeline.add_stage_by_name("gaussian"));
        assert_eq!(pipeline.stage_count(), 3);
        assert_eq!(pipeline.stage_names(), vec!["smooth", "edge", "convolution"]);

        pipeline.clear_stages();
        assert_eq!(pipeline.stage_count(), 0);
    }

    #[test]
    fn test_unknown_name_not_added() {
        let mut pipeline = Pipeline::new();
        assert!(!pipeline.add_stage_by_name("median"));
        assert_eq!(pipeline.stage_count(), 0);

        pipeline.register_filter("median", || Box::new(SmoothingFilter));
        assert!(pipeline.add_stage_by_name("median"));
        assert!(pipeline.registered_filters().contains(&"median"));
    }

    #[test]
    fn test_callback_sees_every_stage() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);

        let mut pipeline = Pipeline::new();
        pipeline.add_stage_by_name("smooth");
        pipeline.add_stage_by_name("edge");
        pipeline.set_stage_callback(move |e| {
            sink.borrow_mut().push((e.index, e.name.to_string(), e.phase));
        });
        pipeline.process(colorful(5, 5)).unwrap();

        let events = events.borrow();
        assert_eq!(
            *events,
            vec![
                (0, "smooth".to_string(), StagePhase::Before),
                (0, "smooth".to_string(), StagePhase::After),
                (1, "edge".to_string(), StagePhase::Before),
                (1, "edge".to_string(), StagePhase::After),
            ]
        );
    }

    #[test]
    fn test_panicking_callback_is_harmless() {
        let mut quiet = Pipeline::new();
        quiet.add_stage_by_name("smooth");
        quiet.add_stage_by_name("edge");
        let expected = quiet.process(colorful(7, 5)).unwrap();

        let mut noisy = Pipeline::new();
        noisy.add_stage_by_name("smooth");
        noisy.add_stage_by_name("edge");
        noisy.set_stage_callback(|_| panic!("observer failure"));
        let got = noisy.process(colorful(7, 5)).unwrap();

        assert_eq!(got.pixels(), expected.pixels());
    }

    #[test]
    fn test_stage_error_propagates_and_keeps_stages() {
        let mut pipeline = Pipeline::new();
        pipeline.add_stage(Box::new(SmoothingFilter));
        pipeline.add_stage(Box::new(Failing));
        assert!(pipeline.process(colorful(4, 4)).is_err());
        assert_eq!(pipeline.stage_count(), 2);
    }

    #[test]
    fn test_run_reports_false_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.ppm");
        let mut pipeline = Pipeline::new();
        assert!(!pipeline.run(dir.path().join("missing.ppm"), &output));
        assert!(!output.exists());
    }
}
