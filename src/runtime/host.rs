//! In-process simulated device
//!
//! Buffers are byte vectors and kernels are host closures registered by name, so
//! conformance checks can run end to end without a driver.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::{
    Backend, BufferElement, BufferHandle, DeviceInfo, KernelArg, KernelHandle, LaunchConfig,
    ProgramType, Runtime, RuntimeError, from_bytes, to_bytes,
};

/// Body of a host kernel
pub type HostKernel =
    Arc<dyn Fn(&mut KernelContext<'_>) -> Result<(), RuntimeError> + Send + Sync>;

/// Arguments and memory visible to a running host kernel
pub struct KernelContext<'a> {
    kernel: &'a str,
    args: &'a [KernelArg],
    buffers: &'a mut FxHashMap<u64, Vec<u8>>,
    config: &'a LaunchConfig,
}

impl KernelContext<'_> {
    pub fn global_size(&self) -> [usize; 3] {
        self.config.global
    }

    /// Total number of work items
    pub fn work_items(&self) -> usize {
        self.config.work_items()
    }

    pub fn arg(&self, index: usize) -> Result<&KernelArg, RuntimeError> {
        self.args.get(index).ok_or_else(|| RuntimeError::MissingArgument {
            kernel: self.kernel.to_string(),
            index,
        })
    }

    fn buffer_id(&self, index: usize) -> Result<u64, RuntimeError> {
        match self.arg(index)? {
            KernelArg::Buffer(handle) => Ok(handle.id()),
            _ => Err(RuntimeError::ArgumentType {
                index,
                expected: "a buffer",
            }),
        }
    }

    /// Elements of the buffer bound at `index`
    pub fn read<T: BufferElement>(&self, index: usize) -> Result<Vec<T>, RuntimeError> {
        let id = self.buffer_id(index)?;
        let bytes = self.buffers.get(&id).ok_or(RuntimeError::UnknownBuffer(id))?;
        from_bytes(bytes)
    }

    /// Overwrite the buffer bound at `index`; `values` must fill it exactly
    pub fn write<T: BufferElement>(&mut self, index: usize, values: &[T]) -> Result<(), RuntimeError> {
        let id = self.buffer_id(index)?;
        let bytes = self.buffers.get_mut(&id).ok_or(RuntimeError::UnknownBuffer(id))?;
        let data = to_bytes(values)?;
        if data.len() != bytes.len() {
            return Err(RuntimeError::SizeMismatch {
                expected: bytes.len(),
                found: data.len(),
            });
        }
        *bytes = data;
        Ok(())
    }

    /// Scalar bound at `index`, decoded as `T`
    pub fn scalar<T: BufferElement>(&self, index: usize) -> Result<T, RuntimeError> {
        let bytes = match self.arg(index)? {
            KernelArg::Int32(v) => v.to_le_bytes().to_vec(),
            KernelArg::Int64(v) => v.to_le_bytes().to_vec(),
            KernelArg::UInt32(v) => v.to_le_bytes().to_vec(),
            KernelArg::UInt64(v) => v.to_le_bytes().to_vec(),
            KernelArg::Float32(v) => v.to_le_bytes().to_vec(),
            KernelArg::Float64(v) => v.to_le_bytes().to_vec(),
            KernelArg::Bytes(bytes) => bytes.clone(),
            KernelArg::Buffer(_) => {
                return Err(RuntimeError::ArgumentType {
                    index,
                    expected: "a scalar",
                });
            }
        };
        if bytes.len() != T::SIZE {
            return Err(RuntimeError::SizeMismatch {
                expected: T::SIZE,
                found: bytes.len(),
            });
        }
        Ok(T::read_le(&bytes))
    }
}

struct KernelInstance {
    name: String,
    body: HostKernel,
    args: Vec<Option<KernelArg>>,
}

/// Runtime whose device is the calling thread
pub struct HostRuntime {
    device_info: DeviceInfo,
    registry: IndexMap<String, HostKernel>,
    buffers: FxHashMap<u64, Vec<u8>>,
    kernels: FxHashMap<u64, KernelInstance>,
    next_id: u64,
}

impl fmt::Debug for HostRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRuntime")
            .field("device_info", &self.device_info)
            .field("registered", &self.registry.keys().collect::<Vec<_>>())
            .field("buffers", &self.buffers.len())
            .field("kernels", &self.kernels.len())
            .finish()
    }
}

impl HostRuntime {
    /// The host exposes a single device, id 0
    pub fn new(device: u32) -> Result<Self, RuntimeError> {
        if device != 0 {
            return Err(RuntimeError::DeviceNotFound(device));
        }
        Ok(Self {
            device_info: DeviceInfo::simulated(),
            registry: IndexMap::new(),
            buffers: FxHashMap::default(),
            kernels: FxHashMap::default(),
            next_id: 1,
        })
    }

    /// Make `body` buildable under `name`, replacing any earlier registration
    pub fn register_kernel<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: Fn(&mut KernelContext<'_>) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(kernel = %name, "registered host kernel");
        self.registry.insert(name, Arc::new(body));
    }

    /// Registered kernel names in registration order
    pub fn kernel_names(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn kernel_mut(&mut self, kernel: &KernelHandle) -> Result<&mut KernelInstance, RuntimeError> {
        self.kernels
            .get_mut(&kernel.id())
            .ok_or(RuntimeError::UnknownKernel(kernel.id()))
    }
}

impl Runtime for HostRuntime {
    fn backend(&self) -> Backend {
        Backend::Host
    }

    fn device_info(&self) -> &DeviceInfo {
        &self.device_info
    }

    fn create_buffer(&mut self, size: usize) -> Result<BufferHandle, RuntimeError> {
        if size == 0 {
            return Err(RuntimeError::InvalidSize);
        }
        let id = self.allocate_id();
        self.buffers.insert(id, vec![0; size]);
        debug!(buffer = id, size, "created buffer");
        Ok(BufferHandle { id, size })
    }

    fn write_buffer(&mut self, buffer: &BufferHandle, data: &[u8]) -> Result<(), RuntimeError> {
        let bytes = self
            .buffers
            .get_mut(&buffer.id())
            .ok_or(RuntimeError::UnknownBuffer(buffer.id()))?;
        if data.len() != bytes.len() {
            return Err(RuntimeError::SizeMismatch {
                expected: bytes.len(),
                found: data.len(),
            });
        }
        bytes.copy_from_slice(data);
        debug!(buffer = buffer.id(), bytes = data.len(), "wrote buffer");
        Ok(())
    }

    fn read_buffer(&self, buffer: &BufferHandle) -> Result<Vec<u8>, RuntimeError> {
        self.buffers
            .get(&buffer.id())
            .cloned()
            .ok_or(RuntimeError::UnknownBuffer(buffer.id()))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) -> Result<(), RuntimeError> {
        self.buffers
            .remove(&buffer.id())
            .map(|_| ())
            .ok_or(RuntimeError::UnknownBuffer(buffer.id()))
    }

    fn create_kernel(
        &mut self,
        name: &str,
        _source: &str,
        build_options: &str,
        program_type: ProgramType,
    ) -> Result<KernelHandle, RuntimeError> {
        let body = self
            .registry
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::KernelBuildFailed {
                name: name.to_string(),
                reason: "no host kernel registered under this name".to_string(),
            })?;

        let id = self.allocate_id();
        debug!(kernel = name, id, build_options, ?program_type, "created kernel");
        self.kernels.insert(
            id,
            KernelInstance {
                name: name.to_string(),
                body,
                args: Vec::new(),
            },
        );
        Ok(KernelHandle {
            id,
            name: name.to_string(),
        })
    }

    fn set_kernel_argument(
        &mut self,
        kernel: &KernelHandle,
        index: usize,
        arg: KernelArg,
    ) -> Result<(), RuntimeError> {
        if let KernelArg::Buffer(buffer) = &arg {
            if !self.buffers.contains_key(&buffer.id()) {
                return Err(RuntimeError::UnknownBuffer(buffer.id()));
            }
        }
        let instance = self.kernel_mut(kernel)?;
        if instance.args.len() <= index {
            instance.args.resize(index + 1, None);
        }
        instance.args[index] = Some(arg);
        Ok(())
    }

    fn run_kernel(&mut self, kernel: &KernelHandle, config: &LaunchConfig) -> Result<(), RuntimeError> {
        config.validate(&self.device_info)?;

        let instance = self
            .kernels
            .get(&kernel.id())
            .ok_or(RuntimeError::UnknownKernel(kernel.id()))?;
        let args = instance
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                arg.clone().ok_or_else(|| RuntimeError::MissingArgument {
                    kernel: instance.name.clone(),
                    index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let body = Arc::clone(&instance.body);

        debug!(kernel = %kernel.name(), work_items = config.work_items(), "running kernel");
        let mut context = KernelContext {
            kernel: kernel.name(),
            args: &args,
            buffers: &mut self.buffers,
            config,
        };
        body(&mut context)
    }

    fn release_kernel(&mut self, kernel: KernelHandle) -> Result<(), RuntimeError> {
        self.kernels
            .remove(&kernel.id())
            .map(|_| ())
            .ok_or(RuntimeError::UnknownKernel(kernel.id()))
    }
}
