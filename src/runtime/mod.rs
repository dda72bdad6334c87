//! Device runtime abstraction
//!
//! Conformance checks drive kernels through the [`Runtime`] trait:
//! - Buffer allocation and transfer
//! - Kernel creation and argument binding
//! - Kernel launch
//!
//! Only the in-process [`HostRuntime`] is built in; its kernels are host closures.

mod buffer;
mod error;
mod host;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use buffer::{BufferElement, byte_len, from_bytes, to_bytes};
pub use error::RuntimeError;
pub use host::{HostKernel, HostRuntime, KernelContext};

/// Runtime backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Backend {
    /// In-process simulated device
    #[default]
    #[serde(rename = "host")]
    Host,
    #[serde(rename = "opencl")]
    OpenCl,
    #[serde(rename = "level_zero")]
    LevelZero,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Host => write!(f, "host"),
            Backend::OpenCl => write!(f, "opencl"),
            Backend::LevelZero => write!(f, "level_zero"),
        }
    }
}

/// `[runtime]` configuration section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub backend: Backend,
    pub device: u32,
}

/// Device buffer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle {
    id: u64,
    size: usize,
}

impl BufferHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Size of the buffer in bytes
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Kernel handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelHandle {
    id: u64,
    name: String,
}

impl KernelHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How kernel source is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramType {
    #[default]
    Source,
    Spirv,
}

/// Kernel argument
#[derive(Debug, Clone, PartialEq)]
pub enum KernelArg {
    Buffer(BufferHandle),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    /// Any other scalar, little-endian at its storage width
    Bytes(Vec<u8>),
}

impl KernelArg {
    pub fn from_buffer(buffer: &BufferHandle) -> Self {
        KernelArg::Buffer(*buffer)
    }

    /// Scalar of any buffer element type, e.g. a `Half`
    pub fn scalar<T: BufferElement>(value: T) -> Self {
        let mut bytes = Vec::with_capacity(T::SIZE);
        value.write_le(&mut bytes);
        KernelArg::Bytes(bytes)
    }
}

/// Device properties
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub name: String,
    pub max_work_group_size: usize,
    pub global_memory: u64,
}

impl DeviceInfo {
    fn simulated() -> Self {
        Self {
            name: "Host Simulated Device".to_string(),
            max_work_group_size: 1024,
            global_memory: 1024 * 1024 * 1024, // 1 GB
        }
    }
}

/// Launch configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Global work size
    pub global: [usize; 3],

    /// Work-group size, chosen by the runtime when absent
    pub local: Option<[usize; 3]>,
}

impl LaunchConfig {
    pub fn new(global: [usize; 3], local: Option<[usize; 3]>) -> Self {
        Self { global, local }
    }

    /// Create a 1D launch configuration
    pub fn new_1d(global: usize) -> Self {
        Self::new([global, 1, 1], None)
    }

    /// Create a 2D launch configuration
    pub fn new_2d(global: (usize, usize)) -> Self {
        Self::new([global.0, global.1, 1], None)
    }

    pub fn with_local(mut self, local: [usize; 3]) -> Self {
        self.local = Some(local);
        self
    }

    pub fn work_items(&self) -> usize {
        self.global.iter().product()
    }

    /// Validate the launch configuration against device limits
    pub fn validate(&self, device_info: &DeviceInfo) -> Result<(), RuntimeError> {
        if self.work_items() == 0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "Global work size {:?} is empty",
                self.global
            )));
        }

        if let Some(local) = self.local {
            let group: usize = local.iter().product();
            if group == 0 || group > device_info.max_work_group_size {
                return Err(RuntimeError::InvalidConfig(format!(
                    "Work-group size ({}) must be between 1 and {}",
                    group, device_info.max_work_group_size
                )));
            }
            if self.global.iter().zip(local).any(|(g, l)| g % l != 0) {
                return Err(RuntimeError::InvalidConfig(format!(
                    "Global size {:?} is not a multiple of local size {:?}",
                    self.global, local
                )));
            }
        }

        Ok(())
    }
}

/// Operations a conformance check needs from a device runtime
pub trait Runtime {
    fn backend(&self) -> Backend;

    fn device_info(&self) -> &DeviceInfo;

    /// Allocate `size` bytes of device memory
    fn create_buffer(&mut self, size: usize) -> Result<BufferHandle, RuntimeError>;

    /// Copy `data` to the device; `data` must fill the buffer exactly
    fn write_buffer(&mut self, buffer: &BufferHandle, data: &[u8]) -> Result<(), RuntimeError>;

    fn read_buffer(&self, buffer: &BufferHandle) -> Result<Vec<u8>, RuntimeError>;

    fn release_buffer(&mut self, buffer: BufferHandle) -> Result<(), RuntimeError>;

    fn create_kernel(
        &mut self,
        name: &str,
        source: &str,
        build_options: &str,
        program_type: ProgramType,
    ) -> Result<KernelHandle, RuntimeError>;

    fn set_kernel_argument(
        &mut self,
        kernel: &KernelHandle,
        index: usize,
        arg: KernelArg,
    ) -> Result<(), RuntimeError>;

    /// Run to completion
    fn run_kernel(&mut self, kernel: &KernelHandle, config: &LaunchConfig) -> Result<(), RuntimeError>;

    fn release_kernel(&mut self, kernel: KernelHandle) -> Result<(), RuntimeError>;
}

/// Typed buffer helpers for every [`Runtime`]
pub trait RuntimeExt: Runtime {
    /// Allocate room for `count` elements of `T`
    fn create_buffer_for<T: BufferElement>(&mut self, count: usize) -> Result<BufferHandle, RuntimeError> {
        self.create_buffer(byte_len::<T>(count)?)
    }

    fn write_elements<T: BufferElement>(
        &mut self,
        buffer: &BufferHandle,
        values: &[T],
    ) -> Result<(), RuntimeError> {
        self.write_buffer(buffer, &to_bytes(values)?)
    }

    fn read_elements<T: BufferElement>(&self, buffer: &BufferHandle) -> Result<Vec<T>, RuntimeError> {
        from_bytes(&self.read_buffer(buffer)?)
    }
}

impl<R: Runtime + ?Sized> RuntimeExt for R {}

/// Build the runtime selected by `config`
pub fn create_runtime(config: &RuntimeConfig) -> Result<Box<dyn Runtime>, RuntimeError> {
    match config.backend {
        Backend::Host => Ok(Box::new(HostRuntime::new(config.device)?)),
        backend @ (Backend::OpenCl | Backend::LevelZero) => {
            Err(RuntimeError::UnsupportedBackend(backend))
        }
    }
}
