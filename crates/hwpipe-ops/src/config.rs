//! YAML pipeline descriptions.
//!
//! ```yaml
//! numeric: fixed          # float (default) or fixed
//! stages:
//!   - filter: gaussian
//!     size: 5
//!     sigma: 1.0
//!   - filter: sharpen
//!   - filter: kernel      # arbitrary odd-sized kernel, row-major
//!     size: 3
//!     weights: [0, 0, 0, 0, 1, 0, 0, 0, 0]
//!   - filter: named       # anything in the filter registry
//!     name: edge
//! ```
//!
//! # Example
//!
//! ```rust
//! use hwpipe_ops::PipelineConfig;
//!
//! let config = PipelineConfig::from_yaml_str("stages:\n  - filter: smooth\n  - filter: edge\n").unwrap();
//! assert_eq!(config, PipelineConfig::basic());
//! let pipeline = config.build_pipeline().unwrap();
//! assert_eq!(pipeline.stage_names(), vec!["smooth", "edge"]);
//! ```

use crate::kernel::{Kernel, DEFAULT_GAUSSIAN_SIGMA, DEFAULT_GAUSSIAN_SIZE};
use crate::{
    ConvolutionFilter, EdgeFilter, Filter, NumericMode, OpsError, OpsResult, Pipeline,
    SmoothingFilter,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

fn default_gaussian_size() -> usize {
    DEFAULT_GAUSSIAN_SIZE
}

fn default_gaussian_sigma() -> f32 {
    DEFAULT_GAUSSIAN_SIGMA
}

fn default_box_size() -> usize {
    3
}

/// One stage of a [`PipelineConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case", deny_unknown_fields)]
pub enum StageConfig {
    /// [`SmoothingFilter`].
    Smooth,
    /// [`EdgeFilter`].
    Edge,
    /// Gaussian convolution.
    Gaussian {
        /// Odd side length.
        #[serde(default = "default_gaussian_size")]
        size: usize,
        /// Standard deviation.
        #[serde(default = "default_gaussian_sigma")]
        sigma: f32,
    },
    /// 3x3 sharpen convolution.
    Sharpen,
    /// Sobel X convolution.
    SobelX,
    /// Sobel Y convolution.
    SobelY,
    /// Box blur convolution.
    Box {
        /// Odd side length.
        #[serde(default = "default_box_size")]
        size: usize,
    },
    /// Convolution with explicit weights.
    Kernel {
        /// Odd side length.
        size: usize,
        /// Row-major weights, `size * size` of them.
        weights: Vec<f32>,
    },
    /// A filter looked up in the pipeline's registry.
    Named {
        /// Registered name.
        name: String,
    },
}

impl StageConfig {
    /// Builds the stage; [`StageConfig::Named`] is resolved through `pipeline`.
    fn build(&self, mode: NumericMode, pipeline: &Pipeline) -> OpsResult<Box<dyn Filter>> {
        let conv = |kernel: Kernel| -> Box<dyn Filter> {
            Box::new(ConvolutionFilter::new(kernel).with_mode(mode))
        };
        let filter: Box<dyn Filter> = match self {
            Self::Smooth => Box::new(SmoothingFilter),
            Self::Edge => Box::new(EdgeFilter),
            Self::Gaussian { size, sigma } => conv(Kernel::gaussian(*size, *sigma)?),
            Self::Sharpen => conv(Kernel::sharpen()),
            Self::SobelX => conv(Kernel::sobel_x()),
            Self::SobelY => conv(Kernel::sobel_y()),
            Self::Box { size } => conv(Kernel::box_blur(*size)?),
            Self::Kernel { size, weights } => conv(Kernel::new(weights.clone(), *size)?),
            Self::Named { name } => pipeline
                .registry()
                .instantiate(name)
                .ok_or_else(|| OpsError::UnknownFilter(name.clone()))?,
        };
        Ok(filter)
    }
}

/// Serializable description of a pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Arithmetic for convolution stages.
    #[serde(default)]
    pub numeric: NumericMode,
    /// Stages in execution order. Empty means grayscale only.
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Smoothing followed by edge detection.
    pub fn basic() -> Self {
        Self {
            numeric: NumericMode::Float,
            stages: vec![StageConfig::Smooth, StageConfig::Edge],
        }
    }

    /// 5x5 Gaussian (sigma 1.0) followed by sharpen.
    pub fn conv() -> Self {
        Self {
            numeric: NumericMode::Float,
            stages: vec![
                StageConfig::Gaussian {
                    size: DEFAULT_GAUSSIAN_SIZE,
                    sigma: DEFAULT_GAUSSIAN_SIGMA,
                },
                StageConfig::Sharpen,
            ],
        }
    }

    /// Preset by name: `basic` or `conv`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::basic()),
            "conv" => Some(Self::conv()),
            _ => None,
        }
    }

    /// Same stages with a different numeric mode.
    pub fn with_numeric(mut self, numeric: NumericMode) -> Self {
        self.numeric = numeric;
        self
    }

    /// Loads a description from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| OpsError::Config(format!("cannot read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loading pipeline config");
        Self::from_yaml_str(&content)
    }

    /// Parses a description from YAML text.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Renders the description as YAML.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Builds a pipeline with the built-in registry for `self.numeric`.
    pub fn build_pipeline(&self) -> OpsResult<Pipeline> {
        self.build_into(Pipeline::with_numeric_mode(self.numeric))
    }

    /// Appends this description's stages to `pipeline`.
    ///
    /// Named stages resolve through `pipeline`'s registry, so custom filters
    /// registered beforehand are available.
    pub fn build_into(&self, mut pipeline: Pipeline) -> OpsResult<Pipeline> {
        for (index, stage) in self.stages.iter().enumerate() {
            let filter = stage.build(self.numeric, &pipeline).map_err(|e| match e {
                OpsError::UnknownFilter(_) => e,
                other => OpsError::Config(format!("stage {index}: {other}")),
            })?;
            pipeline.add_stage(filter);
        }
        Ok(pipeline)
    }
}
