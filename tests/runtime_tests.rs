//! Host runtime end-to-end: buffers, kernels and comparator validation

use pretty_assertions::assert_eq;
use ulpcheck::{
    Config, Half, HostRuntime, KernelArg, LaunchConfig, MathFunction, ProgramType, Runtime,
    RuntimeError, RuntimeExt, Tfloat, UlpComparator, create_runtime,
};

const AXPY: &str = "kernel void axpy(half a, global half *x, global half *y, global half *out)";

fn runtime_with_kernels() -> HostRuntime {
    let mut runtime = HostRuntime::new(0).unwrap();
    runtime.register_kernel("axpy", |ctx| {
        let a: Half = ctx.scalar(0)?;
        let x: Vec<Half> = ctx.read(1)?;
        let y: Vec<Half> = ctx.read(2)?;
        if x.len() < ctx.work_items() || y.len() < ctx.work_items() {
            return Err(RuntimeError::LaunchFailed("global size exceeds the buffers".to_string()));
        }
        // one rounding for the fused multiply-add
        let out: Vec<Half> = x
            .iter()
            .zip(&y)
            .map(|(&x, &y)| Half::from_f32(a.to_f32() * x.to_f32() + y.to_f32()))
            .collect();
        ctx.write(3, &out)
    });
    runtime.register_kernel("sqrt", |ctx| {
        let x: Vec<f32> = ctx.read(0)?;
        let out: Vec<f32> = x.iter().map(|v| v.sqrt()).collect();
        ctx.write(1, &out)
    });
    runtime
}

#[test]
fn test_half_axpy_within_one_ulp() {
    let mut runtime = runtime_with_kernels();
    let n = 64;
    let a = Half::from_f32(1.5);
    let x: Vec<Half> = (0..n).map(|i| Half::from_f32(0.5 + i as f32 * 0.25)).collect();
    let y: Vec<Half> = (0..n).map(|i| Half::from_f32(1.0 + i as f32)).collect();

    let x_buf = runtime.create_buffer_for::<Half>(n).unwrap();
    let y_buf = runtime.create_buffer_for::<Half>(n).unwrap();
    let out_buf = runtime.create_buffer_for::<Half>(n).unwrap();
    assert_eq!(x_buf.size(), 2 * n);
    runtime.write_elements(&x_buf, &x).unwrap();
    runtime.write_elements(&y_buf, &y).unwrap();

    let kernel = runtime.create_kernel("axpy", AXPY, "-cl-std=CL2.0", ProgramType::Source).unwrap();
    runtime.set_kernel_argument(&kernel, 0, KernelArg::scalar(a)).unwrap();
    runtime.set_kernel_argument(&kernel, 1, KernelArg::from_buffer(&x_buf)).unwrap();
    runtime.set_kernel_argument(&kernel, 2, KernelArg::from_buffer(&y_buf)).unwrap();
    runtime.set_kernel_argument(&kernel, 3, KernelArg::from_buffer(&out_buf)).unwrap();
    runtime.run_kernel(&kernel, &LaunchConfig::new_1d(n).with_local([16, 1, 1])).unwrap();

    let results: Vec<Half> = runtime.read_elements(&out_buf).unwrap();
    // host reference rounds after the multiply and after the add
    let references: Vec<Half> = x.iter().zip(&y).map(|(&x, &y)| a * x + y).collect();

    let cmp = UlpComparator::uniform(results.clone(), references.clone(), Half::from_f32(1.0));
    assert!(cmp.matches(&results), "{}", cmp.describe());
    assert_eq!(results[0], Half::from_f32(1.75));

    let strict = UlpComparator::uniform(results.clone(), references, Half::ZERO);
    if let Some(mismatch) = strict.first_mismatch(&results) {
        assert_eq!(mismatch.distance, Some(1));
    }

    runtime.release_kernel(kernel).unwrap();
    for buffer in [x_buf, y_buf, out_buf] {
        runtime.release_buffer(buffer).unwrap();
    }
    assert_eq!(runtime.live_buffers(), 0);
}

#[test]
fn test_sqrt_against_reference_table() {
    let mut runtime = runtime_with_kernels();
    let inputs: Vec<f32> = (1..=32).map(|i| i as f32 * 0.75).collect();

    let input = runtime.create_buffer_for::<f32>(inputs.len()).unwrap();
    let output = runtime.create_buffer_for::<f32>(inputs.len()).unwrap();
    runtime.write_elements(&input, &inputs).unwrap();

    let kernel = runtime.create_kernel("sqrt", "", "", ProgramType::Spirv).unwrap();
    runtime.set_kernel_argument(&kernel, 0, KernelArg::from_buffer(&input)).unwrap();
    runtime.set_kernel_argument(&kernel, 1, KernelArg::from_buffer(&output)).unwrap();
    runtime.run_kernel(&kernel, &LaunchConfig::new_1d(inputs.len())).unwrap();

    let results: Vec<f32> = runtime.read_elements(&output).unwrap();
    let references: Vec<f32> = inputs
        .iter()
        .map(|&x| MathFunction::Sqrt.reference::<f32>(&[x]))
        .collect::<Result<_, _>>()
        .unwrap();
    let bound = MathFunction::Sqrt.ulp_bound(ulpcheck::FloatType::Float).unwrap() as f32;
    let cmp = UlpComparator::uniform(results.clone(), references, bound);
    assert!(cmp.matches(&results));
}

#[test]
fn test_narrow_buffers_use_storage_width() {
    let mut runtime = HostRuntime::new(0).unwrap();
    let values = [Tfloat::from_f32(1.0), Tfloat::from_f32(-0.5)];
    let buffer = runtime.create_buffer_for::<Tfloat>(values.len()).unwrap();
    assert_eq!(buffer.size(), 8);
    runtime.write_elements(&buffer, &values).unwrap();
    assert_eq!(
        runtime.read_buffer(&buffer).unwrap(),
        vec![0x00, 0x00, 0x80, 0x3f, 0x00, 0x00, 0x00, 0xbf]
    );
    let back: Vec<Tfloat> = runtime.read_elements(&buffer).unwrap();
    assert_eq!(back[1].to_bits(), values[1].to_bits());

    let halves = runtime.create_buffer_for::<Half>(3).unwrap();
    assert_eq!(
        runtime.read_elements::<f32>(&halves),
        Err(RuntimeError::Misaligned { size: 6, element: 4 })
    );
}

#[test]
fn test_argument_errors() {
    let mut runtime = runtime_with_kernels();
    let buffer = runtime.create_buffer_for::<f32>(4).unwrap();
    let kernel = runtime.create_kernel("sqrt", "", "", ProgramType::Source).unwrap();

    // index 0 left unset
    runtime.set_kernel_argument(&kernel, 1, KernelArg::from_buffer(&buffer)).unwrap();
    assert_eq!(
        runtime.run_kernel(&kernel, &LaunchConfig::new_1d(4)),
        Err(RuntimeError::MissingArgument {
            kernel: "sqrt".to_string(),
            index: 0,
        })
    );

    // a scalar where the kernel reads a buffer
    runtime.set_kernel_argument(&kernel, 0, KernelArg::Float32(2.0)).unwrap();
    assert_eq!(
        runtime.run_kernel(&kernel, &LaunchConfig::new_1d(4)),
        Err(RuntimeError::ArgumentType {
            index: 0,
            expected: "a buffer",
        })
    );

    let released = buffer;
    runtime.release_buffer(buffer).unwrap();
    assert_eq!(
        runtime.set_kernel_argument(&kernel, 0, KernelArg::from_buffer(&released)),
        Err(RuntimeError::UnknownBuffer(released.id()))
    );
    assert_eq!(runtime.release_buffer(released), Err(RuntimeError::UnknownBuffer(released.id())));
}

#[test]
fn test_kernel_reads_unset_argument() {
    let mut runtime = HostRuntime::new(0).unwrap();
    runtime.register_kernel("scale", |ctx| {
        let factor: f32 = ctx.scalar(1)?;
        let x: Vec<f32> = ctx.read(0)?;
        let out: Vec<f32> = x.iter().map(|v| v * factor).collect();
        ctx.write(0, &out)
    });
    let buffer = runtime.create_buffer_for::<f32>(2).unwrap();
    let kernel = runtime.create_kernel("scale", "", "", ProgramType::Source).unwrap();
    runtime.set_kernel_argument(&kernel, 0, KernelArg::from_buffer(&buffer)).unwrap();

    let err = runtime.run_kernel(&kernel, &LaunchConfig::new_1d(2)).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::MissingArgument {
            kernel: "scale".to_string(),
            index: 1,
        }
    );
    assert_eq!(err.to_string(), "Kernel `scale` argument 1 is not set");
}

#[test]
fn test_oversized_buffer_request() {
    let mut runtime = HostRuntime::new(0).unwrap();
    assert_eq!(
        runtime.create_buffer_for::<f64>(usize::MAX / 2),
        Err(RuntimeError::SizeOverflow {
            count: usize::MAX / 2,
            element: 8,
        })
    );
}

#[test]
fn test_write_size_mismatch() {
    let mut runtime = HostRuntime::new(0).unwrap();
    let buffer = runtime.create_buffer_for::<Half>(2).unwrap();
    let err = runtime.write_elements(&buffer, &[Half::ZERO; 3]).unwrap_err();
    assert_eq!(err, RuntimeError::SizeMismatch { expected: 4, found: 6 });
    assert_eq!(err.to_string(), "Buffer holds 4 bytes, 6 given");
}

#[test]
fn test_runtime_from_config() {
    let config = Config::from_toml_str("[runtime]\nbackend = \"host\"\ndevice = 0").unwrap();
    let mut runtime = create_runtime(&config.runtime).unwrap();
    let buffer = runtime.create_buffer_for::<u32>(3).unwrap();
    runtime.write_elements(&buffer, &[1u32, 2, 3]).unwrap();
    assert_eq!(runtime.read_elements::<u32>(&buffer).unwrap(), vec![1, 2, 3]);
    assert_eq!(runtime.device_info().name, "Host Simulated Device");

    let config = Config::from_toml_str("[runtime]\ndevice = 2").unwrap();
    assert_eq!(create_runtime(&config.runtime).err(), Some(RuntimeError::DeviceNotFound(2)));

    let config = Config::from_toml_str("[runtime]\nbackend = \"opencl\"").unwrap();
    assert!(matches!(
        create_runtime(&config.runtime),
        Err(RuntimeError::UnsupportedBackend(_))
    ));
}
