//! Census Report CLI Application
//!
//! This is the command-line interface for the census report generator.
//! It uses the census-report library and adds:
//! - TOML configuration files with command-line overrides
//! - Text or JSON output to stdout or a file
//! - Verbosity-controlled logging

use anyhow::{Context, Result};
use census_report::{EmptySubsetPolicy, HeaderMode, Report, ReportGenerator};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

mod config;

use config::{AppConfig, OutputFormat};

/// Census Report - Summary statistics over the adult census dataset
#[derive(Parser, Debug)]
#[command(name = "census-report-cli")]
#[command(about = "Compute demographic summary statistics from a census CSV file", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the delimited census file
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Field delimiter
    #[arg(short, long, value_name = "CHAR")]
    delimiter: Option<char>,

    /// Header handling for the first row
    #[arg(long, value_enum)]
    header: Option<HeaderArg>,

    /// Fail when a metric's subset is empty instead of reporting n/a
    #[arg(long)]
    strict: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum HeaderArg {
    Auto,
    Present,
    Absent,
}

impl From<HeaderArg> for HeaderMode {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Auto => HeaderMode::Auto,
            HeaderArg::Present => HeaderMode::Present,
            HeaderArg::Absent => HeaderMode::Absent,
        }
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Census Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using report library v{}", census_report::VERSION);

    let config = resolve_config(&args)?;
    let input = config.input_path()?;

    let generator = ReportGenerator::new(config.report_config());
    let report = generator
        .generate(input)
        .with_context(|| format!("Failed to generate report from {:?}", input))?;

    write_report(&report, &config)
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(data) = &args.data {
        config.input.path = Some(data.clone());
    }
    if let Some(delimiter) = args.delimiter {
        config.input.delimiter = delimiter;
    }
    if let Some(header) = args.header {
        config.input.header = header.into();
    }
    if args.strict {
        config.report.empty_subset = EmptySubsetPolicy::Fail;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }

    log::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn write_report(report: &Report, config: &AppConfig) -> Result<()> {
    let mut out: Box<dyn Write> = match &config.output.path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    render(report, config.output.format, &mut out)?;
    out.flush()?;

    if let Some(path) = &config.output.path {
        log::info!("Report written to {:?}", path);
    }
    Ok(())
}

fn render<W: Write>(report: &Report, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => report.write_text(out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
