use std::fmt::Display;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_decimal::Decimal;
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use valuegen_core::{Schema, merge, normalize_schema};
use valuegen_domain::{DomainNumber, GeneratorConfig, NumberDomain, Range, ValueDomain, numeric_domain};

#[derive(Debug, Parser)]
#[command(name = "valuegen")]
#[command(about = "Schema normalization and test value sampling")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite a schema into canonical form.
    Normalize(NormalizeArgs),
    /// Layer a schema over a set of defaults.
    Merge(MergeArgs),
    /// Draw values from a numeric schema.
    Sample(SampleArgs),
    /// Draw values from a textual number range.
    Range(RangeArgs),
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    /// Schema document (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    input: PathBuf,
    /// Fail if normalization had to correct an inconsistency.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct MergeArgs {
    /// Schema document holding the defaults.
    #[arg(long)]
    defaults: PathBuf,
    /// Schema document whose properties take precedence.
    #[arg(long)]
    input: PathBuf,
    /// Normalize the merged schema.
    #[arg(long)]
    normalize: bool,
}

#[derive(Debug, Args)]
struct GeneratorArgs {
    /// Number of values to draw (default: from config).
    #[arg(long)]
    count: Option<usize>,
    /// Random seed for reproducible output (default: from config, else random).
    #[arg(long)]
    seed: Option<u64>,
    /// Generator configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SampleArgs {
    /// Numeric schema document.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    generator: GeneratorArgs,
}

#[derive(Debug, Args)]
struct RangeArgs {
    /// Range text: `Other`, `< VALUE`, `> VALUE` or a constant `VALUE`.
    #[arg(long)]
    text: String,
    /// Value excluded from an `Other` range (repeatable).
    #[arg(long = "excluded", allow_hyphen_values = true)]
    excluded: Vec<String>,
    /// Required factor of every value.
    #[arg(long, allow_hyphen_values = true)]
    multiple_of: Option<String>,
    /// Forbidden factor of every value (repeatable).
    #[arg(long = "not-multiple-of", allow_hyphen_values = true)]
    not_multiple_of: Vec<String>,
    /// Draw decimals instead of integers.
    #[arg(long)]
    decimal: bool,
    #[command(flatten)]
    generator: GeneratorArgs,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Normalize(args) => run_normalize(args),
        Command::Merge(args) => run_merge(args),
        Command::Sample(args) => run_sample(args),
        Command::Range(args) => run_range(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        },
    };
    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn run_normalize(args: NormalizeArgs) -> Result<(), String> {
    let schema = read_schema(&args.input)?;
    let (schema, diagnostics) = normalize_schema(schema);
    diagnostics.report();

    print_schema(&schema)?;

    if args.strict && diagnostics.has_errors() {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == valuegen_core::Severity::Error)
            .count();
        return Err(format!("normalization corrected {errors} inconsistent constraint(s)"));
    }
    Ok(())
}

fn run_merge(args: MergeArgs) -> Result<(), String> {
    let defaults = read_schema(&args.defaults)?;
    let schema = read_schema(&args.input)?;

    let mut merged = merge(Some(&defaults), Some(&schema)).ok_or("nothing to merge")?;
    if args.normalize {
        let (normalized, diagnostics) = normalize_schema(merged);
        diagnostics.report();
        merged = normalized;
    }
    print_schema(&merged)
}

fn run_sample(args: SampleArgs) -> Result<(), String> {
    let config = load_config(args.generator.config.as_deref())?;
    let schema = read_schema(&args.input)?;

    let (schema, diagnostics) = normalize_schema(schema);
    diagnostics.report();

    let domain = numeric_domain(&schema, &config).map_err(|e| e.to_string())?;
    print_samples(&domain, &args.generator, &config)
}

fn run_range(args: RangeArgs) -> Result<(), String> {
    let config = load_config(args.generator.config.as_deref())?;
    let range = Range::with_excluded(&args.text, args.excluded.iter().map(String::as_str))
        .map_err(|e| e.to_string())?;
    debug!(range = %range, decimal = args.decimal, "Parsed range");

    if args.decimal {
        let mut domain = NumberDomain::<Decimal>::new(config.decimal_max_range);
        domain.set_scale(config.decimal_scale);
        configure_range(&mut domain, &range, &args)?;
        print_samples(&domain, &args.generator, &config)
    } else {
        let mut domain = NumberDomain::<i64>::new(config.integer_max_range);
        configure_range(&mut domain, &range, &args)?;
        print_samples(&domain, &args.generator, &config)
    }
}

fn configure_range<T: DomainNumber>(domain: &mut NumberDomain<T>, range: &Range, args: &RangeArgs) -> Result<(), String> {
    domain.set_range_of(range).map_err(|e| e.to_string())?;
    domain
        .set_multiple_of_text(args.multiple_of.as_deref())
        .map_err(|e| e.to_string())?;
    domain
        .set_not_multiple_ofs_text(args.not_multiple_of.iter().map(String::as_str))
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn print_samples<D>(domain: &D, args: &GeneratorArgs, config: &GeneratorConfig) -> Result<(), String>
where
    D: ValueDomain,
    D::Value: Display,
{
    let count = args.count.unwrap_or(config.samples);
    let mut rng = match args.seed.or(config.seed) {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    info!(count, "Sampling values");
    for _ in 0..count {
        let value = domain.select(&mut rng).map_err(|e| e.to_string())?;
        println!("{value}");
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => GeneratorConfig::load(path).map_err(|e| format!("failed to load {}: {e}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn read_schema(path: &Path) -> Result<Schema, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );

    let schema = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&raw).map_err(|e| e.to_string())
    };
    schema.map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

fn print_schema(schema: &Schema) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(schema).map_err(|e| format!("JSON serialization failed: {e}"))?;
    println!("{rendered}");
    Ok(())
}
