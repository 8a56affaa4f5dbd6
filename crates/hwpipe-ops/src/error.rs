//! Error types for filter and pipeline operations.

use thiserror::Error;

/// Error type for filter and pipeline operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Kernel geometry or weights are unusable.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Input and output buffers have different geometry.
    #[error("size mismatch: input {input_w}x{input_h}, output {output_w}x{output_h}")]
    SizeMismatch {
        /// Input width.
        input_w: u32,
        /// Input height.
        input_h: u32,
        /// Output width.
        output_w: u32,
        /// Output height.
        output_h: u32,
    },

    /// No filter is registered under this name.
    #[error("unknown filter: '{0}'")]
    UnknownFilter(String),

    /// Pipeline description is structurally valid YAML but semantically wrong.
    #[error("pipeline config: {0}")]
    Config(String),

    /// Pipeline description could not be parsed.
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Buffer management failure.
    #[error(transparent)]
    Core(#[from] hwpipe_core::Error),

    /// Decode or encode failure.
    #[error(transparent)]
    Io(#[from] hwpipe_io::IoError),
}

/// Result type for filter and pipeline operations.
pub type OpsResult<T> = Result<T, OpsError>;
