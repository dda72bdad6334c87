//! ulpcheck CLI
//!
//! Main entry point for the `ulpc` command.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use ulpcheck::{
    Bfloat, CaseFile, CheckError, Config, FloatType, Half, NumericLimits, ReducedFloat,
    RoundingMode, Tfloat, UlpFloat, try_ulp_distance,
};

#[derive(Parser)]
#[command(name = "ulpc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reduced-precision float emulation and ULP precision checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./ulpcheck.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Narrow an f32 value and print its storage encoding
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f32,

        /// Target format
        #[arg(short, long, value_enum, default_value = "all")]
        format: FormatArg,

        /// Rounding direction (rne, rtz, rtp, rtn)
        #[arg(short, long, default_value = "rne")]
        rounding: RoundingMode,

        /// Stochastic rounding dither as f32 bits in hex (half only)
        #[arg(long, value_name = "BITS")]
        random: Option<String>,
    },

    /// Decode a storage encoding
    Decode {
        /// Storage bits in hex
        #[arg(value_name = "HEX")]
        bits: String,

        #[arg(short, long, value_enum)]
        format: NarrowFormat,
    },

    /// ULP distance between two values
    Ulp {
        #[arg(allow_negative_numbers = true)]
        a: f64,

        #[arg(allow_negative_numbers = true)]
        b: f64,

        /// Working precision
        #[arg(short, long, default_value = "float")]
        precision: FloatType,
    },

    /// Evaluate a TOML case file
    Check {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// Show version and numeric limits
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum NarrowFormat {
    Half,
    Bfloat,
    Tfloat,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormatArg {
    Half,
    Bfloat,
    Tfloat,
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert {
            value,
            format,
            rounding,
            random,
        } => convert(value, format, rounding, random.as_deref()),

        Commands::Decode { bits, format } => decode(&bits, format),

        Commands::Ulp { a, b, precision } => ulp(a, b, precision),

        Commands::Check { input, json } => check(&input, json || config.report.json, &config),

        Commands::Info => info(),
    }
}

fn parse_hex(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16)
        .map_err(|e| CheckError::invalid_value(text, e.to_string()).into())
}

fn print_encoding<F: ReducedFloat>(value: F) {
    println!(
        "{:<7} {:>#12x}  {}",
        F::NAME,
        value.storage(),
        value.widen()
    );
}

fn convert(value: f32, format: FormatArg, rounding: RoundingMode, random: Option<&str>) -> Result<()> {
    tracing::info!("Converting {} with {}", value, rounding);

    if let Some(random) = random {
        if format != FormatArg::Half {
            return Err(CheckError::invalid_value(
                random,
                "stochastic rounding is only available for --format half",
            )
            .into());
        }
        let random = f32::from_bits(parse_hex(random)?);
        print_encoding(Half::from_f32_stochastic(value, random));
        return Ok(());
    }

    if matches!(format, FormatArg::Half | FormatArg::All) {
        print_encoding(Half::narrow(value, rounding));
    }
    if matches!(format, FormatArg::Bfloat | FormatArg::All) {
        print_encoding(Bfloat::narrow(value, rounding));
    }
    if matches!(format, FormatArg::Tfloat | FormatArg::All) {
        print_encoding(Tfloat::narrow(value, rounding));
    }
    Ok(())
}

fn describe_bits<F: ReducedFloat>(value: F) {
    println!("{}: {}", F::NAME, value.widen());
    println!("  nan:      {}", value.is_nan());
    println!("  infinite: {}", value.is_infinite());
    println!("  denormal: {}", value.is_denormal());
    println!("  zero:     {}", value.is_zero());
    println!("  negative: {}", value.is_sign_negative());
}

fn decode(bits: &str, format: NarrowFormat) -> Result<()> {
    let raw = parse_hex(bits)?;
    let narrow = |max: u32| -> Result<u32> {
        if raw > max {
            return Err(CheckError::invalid_value(bits, "does not fit the storage width").into());
        }
        Ok(raw)
    };
    match format {
        NarrowFormat::Half => describe_bits(Half::from_bits(narrow(0xffff)? as u16)),
        NarrowFormat::Bfloat => describe_bits(Bfloat::from_bits(narrow(0xffff)? as u16)),
        NarrowFormat::Tfloat => describe_bits(Tfloat::from_bits(raw)),
    }
    Ok(())
}

fn distance<F: UlpFloat>(a: f64, b: f64) -> (String, String, Option<u64>) {
    let (a, b) = (F::from_f64(a), F::from_f64(b));
    (a.to_string(), b.to_string(), try_ulp_distance(a, b))
}

fn ulp(a: f64, b: f64, precision: FloatType) -> Result<()> {
    let (a, b, distance) = match precision {
        FloatType::Half => distance::<Half>(a, b),
        FloatType::Bfloat => distance::<Bfloat>(a, b),
        FloatType::Tfloat => distance::<Tfloat>(a, b),
        FloatType::Float => distance::<f32>(a, b),
        FloatType::Double => distance::<f64>(a, b),
    };
    match distance {
        Some(distance) => println!("{} vs {}: {} ULP ({})", a, b, distance, precision),
        None => println!("{} vs {}: n/a, NaN operand ({})", a, b, precision),
    }
    Ok(())
}

fn check(input: &Path, json: bool, config: &Config) -> Result<()> {
    tracing::info!("Checking {:?}", input);

    let cases = CaseFile::load(input)?;
    let report = cases.evaluate(&config.tolerance)?;

    if json {
        let text = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{}", text);
    } else {
        for case in &report.cases {
            let status = if case.passed { "PASS" } else { "FAIL" };
            println!("{} {} ({})", status, case.name, case.precision);
            if let Some(description) = &case.description {
                for line in description.lines() {
                    println!("    {}", line);
                }
            }
        }
        println!();
        println!("{} passed, {} failed", report.passed, report.failed);
    }

    if !report.all_passed() {
        return Err(miette::miette!(
            "{} of {} cases failed in {}",
            report.failed,
            report.total,
            input.display()
        ));
    }
    Ok(())
}

fn print_limits<F: ReducedFloat + NumericLimits>() {
    println!("{}:", F::NAME);
    println!("  max:          {}", F::MAX.widen());
    println!("  min_positive: {}", F::MIN_POSITIVE.widen());
    println!("  denorm_min:   {}", F::DENORM_MIN.widen());
    println!("  epsilon:      {}", F::EPSILON.widen());
    println!("  digits:       {}", F::DIGITS);
    println!("  exponents:    [{}, {}]", F::MIN_EXP, F::MAX_EXP);
}

fn info() -> Result<()> {
    println!("ulpcheck");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    print_limits::<Half>();
    print_limits::<Bfloat>();
    print_limits::<Tfloat>();
    Ok(())
}
