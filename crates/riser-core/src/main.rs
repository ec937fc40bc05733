//! RISeR - Incremental slip rate calculator
//!
//! The main entry point for riser, handling:
//! - Parametric PDF generation and PDF division
//! - Constrained resampling of marker chains
//! - Density estimation and probable-range analysis

use std::io::Write as _;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use riser_core::analysis::{analyze_pdf, methods_for, AnalysisError};
use riser_core::config::{load_config, ConfigError, ResolvedSettings, Settings, ValidationError};
use riser_core::exit_codes::ExitCode;
use riser_core::log_event;
use riser_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, LogLevel, Stage,
};
use riser_core::markers::{load_markers, MarkerFileError};
use riser_core::output::{
    render_analyze_summary, render_resample_summary, write_interval_pdfs, AnalyzeReport,
    OutputFormat, ResampleReport,
};
use riser_core::pdf_file::{format_pdf, read_pdf, write_pdf, PdfFileError};
use riser_core::pipeline::{run_pipeline, PipelineError};
use riser_core::resample::ResampleError;
use riser_math::{
    divide, BinCount, DensityError, DensityMode, Distribution, DistributionKind, DomainError,
    PdfTable, QuotientError, QuotientOptions, RangeError, RangeMethod, Smoothing, DEFAULT_POINTS,
};
use thiserror::Error;

/// RISeR - incremental slip rates from dated, offset markers
#[derive(Parser)]
#[command(name = "riser")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (overrides RISER_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Tabulate a parametric distribution as a PDF file
    MakePdf(MakePdfArgs),

    /// Divide one PDF by another (e.g. displacement / age)
    Divide(DivideArgs),

    /// Resample a marker chain and report incremental slip rates
    Resample(ResampleArgs),

    /// Report probable ranges of an existing PDF file
    Analyze(AnalyzeArgs),

    /// Settings management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct MakePdfArgs {
    /// Distribution shape (gaussian, uniform, triangular, trapezoidal)
    #[arg(long, short = 'd')]
    distribution: DistributionKind,

    /// Shape parameters: mean and std dev for gaussian, corner values otherwise
    #[arg(
        long,
        required = true,
        num_args = 1..,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    values: Vec<f64>,

    /// Number of support points
    #[arg(long, default_value_t = DEFAULT_POINTS)]
    points: usize,

    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DivideArgs {
    /// Numerator PDF file
    numerator: PathBuf,

    /// Denominator PDF file
    denominator: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Quotient axis spacing
    #[arg(long)]
    step: Option<f64>,

    /// Upper limit of the quotient axis
    #[arg(long)]
    max_quotient: Option<f64>,
}

/// Which range summaries to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodChoice {
    Iqr,
    Hpd,
    Both,
}

impl MethodChoice {
    fn methods(choice: Option<Self>, configured: RangeMethod) -> Vec<RangeMethod> {
        match choice {
            None => methods_for(configured, false),
            Some(MethodChoice::Iqr) => methods_for(RangeMethod::Iqr, false),
            Some(MethodChoice::Hpd) => methods_for(RangeMethod::Hpd, false),
            Some(MethodChoice::Both) => methods_for(configured, true),
        }
    }
}

#[derive(Args, Debug)]
struct ResampleArgs {
    /// Marker list file (name, age PDF, displacement PDF per line)
    markers: PathBuf,

    /// Accepted samples per interval
    #[arg(long)]
    target_count: Option<usize>,

    /// Iteration cap
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Reject draws with any rate above this value
    #[arg(long)]
    max_rate: Option<f64>,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    workers: Option<usize>,

    /// Density estimator (kde, histogram)
    #[arg(long)]
    mode: Option<DensityMode>,

    /// Histogram bin count or `auto`
    #[arg(long)]
    bins: Option<BinCount>,

    /// Smoothing kernel: none, mean:<w>, gaussian:<w>
    #[arg(long)]
    smoothing: Option<Smoothing>,

    /// Probability mass enclosed by reported ranges
    #[arg(long)]
    mass: Option<f64>,

    /// Range summary to report
    #[arg(long, value_enum)]
    method: Option<MethodChoice>,

    /// Write one PDF file per interval into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Report format
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// PDF file to analyze
    pdf: PathBuf,

    /// Probability mass enclosed by reported ranges
    #[arg(long)]
    mass: Option<f64>,

    /// Range summary to report
    #[arg(long, value_enum)]
    method: Option<MethodChoice>,

    /// Report format
    #[arg(long, short = 'f', value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective settings as JSON
    Show,
}

/// Any failure a command can end with.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pdf(#[from] PdfFileError),

    #[error(transparent)]
    Markers(#[from] MarkerFileError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Quotient(#[from] QuotientError),

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error("cannot write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CommandError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CommandError::Config(ConfigError::Invalid {
                source: ValidationError::IoError(_),
                ..
            }) => ExitCode::IoError,
            CommandError::Config(_) => ExitCode::ArgsError,
            CommandError::Pdf(e) if e.is_io() => ExitCode::IoError,
            CommandError::Markers(e) if e.is_io() => ExitCode::IoError,
            CommandError::Pdf(_) | CommandError::Markers(_) | CommandError::Domain(_) => {
                ExitCode::InputError
            }
            CommandError::Pipeline(PipelineError::Resample(e)) => match e {
                ResampleError::Convergence(_) => ExitCode::ConvergenceFailed,
                ResampleError::InvalidSettings(_) => ExitCode::ArgsError,
                ResampleError::TooFewMarkers { .. } | ResampleError::MismatchedLists { .. } => {
                    ExitCode::InputError
                }
                ResampleError::WorkerFailed { .. } => ExitCode::InternalError,
            },
            CommandError::Pipeline(PipelineError::Analysis(e)) => match e {
                AnalysisError::Density {
                    source: DensityError::InvalidOption { .. },
                    ..
                }
                | AnalysisError::Range { .. } => ExitCode::ArgsError,
                _ => ExitCode::InternalError,
            },
            CommandError::Quotient(
                QuotientError::InvalidStep { .. } | QuotientError::AxisTooLarge { .. },
            ) => ExitCode::ArgsError,
            CommandError::Quotient(_) => ExitCode::InputError,
            CommandError::Range(_) => ExitCode::ArgsError,
            CommandError::Io(_) => ExitCode::IoError,
            CommandError::Serialize(_) => ExitCode::InternalError,
        }
    }
}

type CommandResult = Result<(), CommandError>;

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version keep clap's own handling.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            std::process::exit(ExitCode::ArgsError.as_i32());
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format)
        .adjust_verbosity(cli.global.verbose, cli.global.quiet);
    init_logging(&log_config);

    let command = match &cli.command {
        Commands::MakePdf(_) => "make-pdf",
        Commands::Divide(_) => "divide",
        Commands::Resample(_) => "resample",
        Commands::Analyze(_) => "analyze",
        Commands::Config(_) => "config",
    };
    let ctx = LogContext::new(generate_run_id()).with_command(command);
    let span = tracing::info_span!("run", run_id = %ctx.run_id, command = command);
    let _guard = span.enter();

    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "run started");

    let result = match &cli.command {
        Commands::MakePdf(args) => run_make_pdf(&ctx, args),
        Commands::Divide(args) => run_divide(&ctx, args),
        Commands::Resample(args) => run_resample(&ctx, &cli.global, args),
        Commands::Analyze(args) => run_analyze(&ctx, &cli.global, args),
        Commands::Config(args) => run_config(&ctx, &cli.global, args),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => {
            let code = err.exit_code();
            log_event!(
                ctx,
                ERROR,
                event_names::COMMAND_FAILED,
                Stage::Init,
                "command failed",
                error = tracing::field::display(&err),
                exit_code = code.as_i32()
            );
            eprintln!("riser: {}", err);
            code
        }
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Output,
        "run finished",
        exit_code = exit_code.as_i32()
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load_settings(ctx: &LogContext, global: &GlobalOpts) -> Result<ResolvedSettings, CommandError> {
    let resolved = load_config(global.config.as_deref())?;
    match &resolved.path {
        Some(path) => log_event!(
            ctx,
            INFO,
            event_names::CONFIG_LOADED,
            Stage::Init,
            "settings loaded",
            path = tracing::field::display(path.display()),
            source = tracing::field::display(resolved.source)
        ),
        None => log_event!(
            ctx,
            DEBUG,
            event_names::CONFIG_DEFAULT_USED,
            Stage::Init,
            "using built-in settings"
        ),
    }
    Ok(resolved)
}

/// Re-check settings after command-line overrides.
fn revalidate(settings: &Settings) -> Result<(), CommandError> {
    riser_config::validate_settings(settings).map_err(ConfigError::Validation)?;
    Ok(())
}

fn load_pdf(ctx: &LogContext, path: &Path) -> Result<PdfTable, CommandError> {
    let pdf = read_pdf(path)?;
    log_event!(
        ctx,
        DEBUG,
        event_names::PDF_LOADED,
        Stage::Load,
        "PDF loaded",
        path = tracing::field::display(path.display()),
        points = pdf.points()
    );
    Ok(pdf)
}

fn emit_pdf(ctx: &LogContext, pdf: &PdfTable, output: Option<&Path>) -> CommandResult {
    match output {
        Some(path) => {
            write_pdf(path, pdf)?;
            log_event!(
                ctx,
                INFO,
                event_names::OUTPUT_WRITTEN,
                Stage::Output,
                "PDF written",
                path = tracing::field::display(path.display()),
                points = pdf.points()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(format_pdf(pdf).as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn print_payload(text: &str) -> CommandResult {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_make_pdf(ctx: &LogContext, args: &MakePdfArgs) -> CommandResult {
    let dist = Distribution::from_values(args.distribution, &args.values)?;
    let pdf = dist.build_pdf(args.points)?;
    emit_pdf(ctx, &pdf, args.output.as_deref())
}

fn run_divide(ctx: &LogContext, args: &DivideArgs) -> CommandResult {
    let numerator = load_pdf(ctx, &args.numerator)?;
    let denominator = load_pdf(ctx, &args.denominator)?;
    let options = QuotientOptions {
        step: args.step,
        max_quotient: args.max_quotient,
    };
    let quotient = divide(&numerator, &denominator, &options)?;
    emit_pdf(ctx, &quotient, args.output.as_deref())
}

fn apply_resample_overrides(settings: &mut Settings, args: &ResampleArgs) {
    let resample = &mut settings.resample;
    if let Some(n) = args.target_count {
        resample.target_count = n;
    }
    if let Some(n) = args.max_iterations {
        resample.max_iterations = n;
    }
    if args.max_rate.is_some() {
        resample.max_rate = args.max_rate;
    }
    if args.seed.is_some() {
        resample.seed = args.seed;
    }
    if let Some(n) = args.workers {
        resample.workers = n;
    }

    let density = &mut settings.density;
    if let Some(mode) = args.mode {
        density.mode = mode;
    }
    if let Some(bins) = args.bins {
        density.bin_count = bins;
    }
    if let Some(smoothing) = args.smoothing {
        density.smoothing = smoothing;
    }

    if let Some(mass) = args.mass {
        settings.analysis.mass = mass;
    }
}

fn run_resample(ctx: &LogContext, global: &GlobalOpts, args: &ResampleArgs) -> CommandResult {
    let mut settings = load_settings(ctx, global)?.settings;
    apply_resample_overrides(&mut settings, args);
    revalidate(&settings)?;

    let chain = load_markers(&args.markers)?;
    log_event!(
        ctx,
        INFO,
        event_names::MARKERS_LOADED,
        Stage::Load,
        "marker chain loaded",
        path = tracing::field::display(args.markers.display()),
        markers = chain.len()
    );

    let methods = MethodChoice::methods(args.method, settings.analysis.method);
    let outcome = run_pipeline(&chain, &settings, &methods)?;

    let pdf_files = match &args.output_dir {
        Some(dir) => {
            let files = write_interval_pdfs(dir, &outcome.intervals)?;
            log_event!(
                ctx,
                INFO,
                event_names::OUTPUT_WRITTEN,
                Stage::Output,
                "interval PDFs written",
                dir = tracing::field::display(dir.display()),
                files = files.len()
            );
            files
        }
        None => Vec::new(),
    };

    let names: Vec<&str> = chain.markers().iter().map(|m| m.name()).collect();
    let report = ResampleReport::new(&ctx.run_id, names, &outcome.stats, &outcome.intervals)
        .with_pdf_files(pdf_files);
    match args.format {
        OutputFormat::Json => print_payload(&serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print_payload(&render_resample_summary(&report)),
    }
}

fn run_analyze(ctx: &LogContext, global: &GlobalOpts, args: &AnalyzeArgs) -> CommandResult {
    let mut settings = load_settings(ctx, global)?.settings;
    if let Some(mass) = args.mass {
        settings.analysis.mass = mass;
    }
    revalidate(&settings)?;

    let pdf = load_pdf(ctx, &args.pdf)?;
    let methods = MethodChoice::methods(args.method, settings.analysis.method);
    let ranges = analyze_pdf(
        &pdf,
        settings.analysis.mass,
        &methods,
        settings.analysis.hpd_resolution,
    )?;
    log_event!(
        ctx,
        DEBUG,
        event_names::RANGES_COMPUTED,
        Stage::Analyze,
        "ranges computed",
        summaries = ranges.len()
    );

    let report = AnalyzeReport::new(&ctx.run_id, &args.pdf, &pdf, &ranges);
    match args.format {
        OutputFormat::Json => print_payload(&serde_json::to_string_pretty(&report)?),
        OutputFormat::Summary => print_payload(&render_analyze_summary(&report)),
    }
}

fn run_config(ctx: &LogContext, global: &GlobalOpts, args: &ConfigArgs) -> CommandResult {
    match args.command {
        ConfigCommands::Show => {
            let resolved = load_settings(ctx, global)?;
            let json = resolved
                .settings
                .to_json_pretty()
                .map_err(ConfigError::Validation)?;
            print_payload(&json)
        }
    }
}
