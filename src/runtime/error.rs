use thiserror::Error;

use super::Backend;

/// Runtime errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Runtime backend `{0}` is not supported in this build")]
    UnsupportedBackend(Backend),

    #[error("Device {0} not found")]
    DeviceNotFound(u32),

    #[error("Unknown buffer handle {0}")]
    UnknownBuffer(u64),

    #[error("Unknown kernel handle {0}")]
    UnknownKernel(u64),

    #[error("Invalid size: buffers must hold at least one byte")]
    InvalidSize,

    #[error("Buffer holds {expected} bytes, {found} given")]
    SizeMismatch { expected: usize, found: usize },

    #[error("{count} elements of {element} bytes overflow the address space")]
    SizeOverflow { count: usize, element: usize },

    #[error("{size} bytes is not a whole number of {element}-byte elements")]
    Misaligned { size: usize, element: usize },

    #[error("Failed to build kernel `{name}`: {reason}")]
    KernelBuildFailed { name: String, reason: String },

    #[error("Kernel `{kernel}` argument {index} is not set")]
    MissingArgument { kernel: String, index: usize },

    #[error("Kernel argument {index} is not {expected}")]
    ArgumentType { index: usize, expected: &'static str },

    #[error("Invalid launch configuration: {0}")]
    InvalidConfig(String),

    #[error("Kernel launch failed: {0}")]
    LaunchFailed(String),
}
