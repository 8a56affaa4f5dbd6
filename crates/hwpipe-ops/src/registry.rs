//! Name to constructor mapping for pipeline stages.
//!
//! # Example
//!
//! ```
//! use hwpipe_ops::{FilterRegistry, NumericMode, SmoothingFilter};
//!
//! let mut registry = FilterRegistry::with_builtins(NumericMode::Fixed);
//! assert!(registry.contains("edge"));
//!
//! registry.register("blur", || Box::new(SmoothingFilter));
//! assert_eq!(registry.instantiate("blur").unwrap().name(), "smooth");
//! assert!(registry.instantiate("nope").is_none());
//! ```

use crate::kernel::Kernel;
use crate::{ConvolutionFilter, EdgeFilter, Filter, NumericMode, SmoothingFilter};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Constructor stored in a [`FilterRegistry`].
pub type FilterFactory = Box<dyn Fn() -> Box<dyn Filter>>;

/// Registry of filter constructors keyed by name.
#[derive(Default)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in stages; convolution stages use `mode`.
    ///
    /// | Name | Stage |
    /// |------|-------|
    /// | `smooth` | [`SmoothingFilter`] |
    /// | `edge` | [`EdgeFilter`] |
    /// | `gaussian` | 5x5 Gaussian, sigma 1.0 |
    /// | `sharpen` | 3x3 sharpen |
    /// | `sobel_x`, `sobel_y` | directional Sobel convolution |
    /// | `box` | 3x3 box blur convolution |
    pub fn with_builtins(mode: NumericMode) -> Self {
        let mut registry = Self::new();
        registry.register("smooth", || Box::new(SmoothingFilter));
        registry.register("edge", || Box::new(EdgeFilter));

        let convolutions: [(&str, fn() -> Kernel); 5] = [
            ("gaussian", Kernel::default_gaussian),
            ("sharpen", Kernel::sharpen),
            ("sobel_x", Kernel::sobel_x),
            ("sobel_y", Kernel::sobel_y),
            ("box", Kernel::box3),
        ];
        for (name, kernel) in convolutions {
            registry.register(name, move || {
                Box::new(ConvolutionFilter::new(kernel()).with_mode(mode))
            });
        }
        registry
    }

    /// Registers a constructor, silently replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Filter> + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            debug!(name = %name, "filter constructor replaced");
        }
    }

    /// Builds a new filter, or `None` if the name is not registered.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Filter>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered constructors.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
