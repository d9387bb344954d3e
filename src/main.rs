use anyhow::{Context, Result};
use clap::Parser;
use perf_tracer::cli::{Cli, OutputFormat};
use perf_tracer::csv_output::CsvOutput;
use perf_tracer::json_output::JsonOutput;
use perf_tracer::{replay, PerfTracer, Report, TracerConfig};
use regex::Regex;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Build the tracer configuration: config file first, then CLI overrides
fn load_config(args: &Cli) -> Result<TracerConfig> {
    let mut config = match &args.config {
        Some(path) => TracerConfig::from_file(path)?,
        None => TracerConfig::default(),
    };

    if let Some(max_events) = args.max_events {
        config.max_events = max_events;
    }
    if let Some(bucket_bits) = args.bucket_bits {
        config.bucket_bits = bucket_bits;
    }
    if args.disabled {
        config.start_enabled = false;
    }

    config.validate().context("Invalid tracer configuration")?;
    Ok(config)
}

/// Render a report in the requested format
fn render(report: &Report, format: OutputFormat, filter: Option<&Regex>) -> Result<String> {
    let mut report = report.clone();
    if let Some(pattern) = filter {
        report.retain_matching(pattern);
    }

    match format {
        OutputFormat::Text => Ok(report.to_text()),
        OutputFormat::Json => {
            let mut json = JsonOutput::from_report(&report).to_json()?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => Ok(CsvOutput::from_report(&report).to_csv()),
    }
}

fn open_script(args: &Cli) -> Result<Box<dyn BufRead>> {
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!(?config, "tracer configuration");

    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --filter regex")?;

    let tracer = PerfTracer::new(&config);
    let script = open_script(&args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut render_error = None;
    let result = replay::run(&tracer, script, |report| {
        match render(report, args.format, filter.as_ref()) {
            Ok(text) => out.write_all(text.as_bytes()),
            Err(e) => {
                render_error = Some(e);
                Err(io::Error::other("report rendering failed"))
            }
        }
    });

    if let Some(e) = render_error {
        return Err(e);
    }
    result?;

    let text = render(&tracer.report(), args.format, filter.as_ref())?;
    out.write_all(text.as_bytes())?;
    out.flush()?;

    Ok(())
}
