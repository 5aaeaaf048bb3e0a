//! entigen CLI - compile an entity schema and run a backend over it.
//!
//! Usage:
//!   entigen <schema> [-b outline|memory] [-o <dir>] [--namespace <name>]
//!           [--indent <n>] [--keep-going] [--model-out <path>] [-v|-q]
//!
//! Examples:
//!   entigen blog.ent
//!   entigen blog.ent -b memory -o generated --keep-going
//!   entigen blog.ent --model-out blog.msgpack -vv

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use entigen_codegen::GeneratorConfig;
use entigen_runtime::{BackendKind, Driver, DriverError, save_to_file};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "entigen")]
#[command(about = "Compile an entity schema into storage-layer interfaces")]
#[command(version)]
struct Cli {
    /// Path to the schema file
    input: PathBuf,

    /// Backend to run
    #[arg(short, long, default_value = "outline")]
    backend: BackendArg,

    /// Directory the artifact is written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Namespace for generated code (defaults to the schema file stem)
    #[arg(long)]
    namespace: Option<String>,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Keep generating other operations after a backend failure
    #[arg(long)]
    keep_going: bool,

    /// Also write a MessagePack snapshot of the compiled model
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// More log output (repeatable)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Outline,
    Memory,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Outline => BackendKind::Outline,
            BackendArg::Memory => BackendKind::Memory,
        }
    }
}

impl Cli {
    fn level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    fn generator_config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::new()
            .with_indent(self.indent)
            .with_continue_on_error(self.keep_going);
        match &self.namespace {
            Some(namespace) => config.with_namespace(namespace.clone()),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&cli) {
        Ok(clean) => {
            if clean {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether generation finished without collected failures.
fn run(cli: &Cli) -> Result<bool, DriverError> {
    let driver = Driver::new(cli.backend.into()).with_config(cli.generator_config());
    let outcome = driver.run(&cli.input, &cli.output)?;

    if let Some(path) = &cli.model_out {
        save_to_file(&outcome.model, path)?;
    }

    for failure in &outcome.report.failures {
        eprintln!("failed: {failure}");
    }
    println!("{}", outcome.path.display());
    Ok(outcome.report.is_clean())
}

fn report(error: &DriverError) {
    match error {
        DriverError::Compile(e) => match &e.context {
            Some(context) => eprintln!("error {context}: {e}"),
            None => eprintln!("error: {e}"),
        },
        DriverError::Backend(e) => eprintln!("error: {e}"),
    }
}
