use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ts_importer::diagnostic::SourceDb;
use ts_importer::{translate, ImporterConfig};

#[derive(Parser, Debug)]
#[command(
    name = "ts-importer",
    version,
    about = "Import TypeScript declaration files as Scala.js facades"
)]
struct Cli {
    /// Declaration file to import (.d.ts)
    input: PathBuf,

    /// Write the Scala source here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dotted package for the generated declarations (default: config, then `importedjs`)
    #[arg(short, long)]
    package: Option<String>,

    /// Config file (default: ts-importer.toml in the current directory, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Omit the `import scala.scalajs.js` header
    #[arg(long)]
    no_header: bool,

    /// Spaces per indentation level
    #[arg(long)]
    indent: Option<usize>,

    /// Enable verbose debug logging (or set TS_IMPORTER_LOG)
    #[arg(short, long)]
    debug: bool,

    /// Suppress warnings
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TS_IMPORTER_LOG").unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => ImporterConfig::load_from_path(path)?,
        None => ImporterConfig::load()?.unwrap_or_default(),
    };
    let package = cli
        .package
        .clone()
        .unwrap_or_else(|| config.package().to_string());
    let mut options = config.emit_options();
    if let Some(indent) = cli.indent {
        options.indent = indent;
    }
    if cli.no_header {
        options.header = false;
    }

    tracing::debug!(input = %cli.input.display(), %package, "reading source");
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let translation = translate(&source, &package, &options);
    let db = SourceDb::new(cli.input.display().to_string(), source);
    let translation = match translation {
        Ok(translation) => translation,
        Err(err) => {
            db.report_parse_error(&err);
            return Ok(ExitCode::FAILURE);
        }
    };

    if !cli.quiet {
        for warning in &translation.parse_warnings {
            db.report_parse_warning(warning);
        }
        for warning in &translation.warnings {
            db.report_import_warning(warning);
        }
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, &translation.code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(output = %path.display(), "wrote output");
        }
        None => io::stdout()
            .lock()
            .write_all(translation.code.as_bytes())
            .context("failed to write to stdout")?,
    }

    Ok(ExitCode::SUCCESS)
}
