//! The compile pipeline: load a schema file, compile it, run a backend
//! over the model, and write the artifact.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use entigen_codegen::{
    Artifact, BackendError, Generator, GeneratorConfig, MemoryBackend, Orchestrator, OutlineBackend, Report,
};
use entigen_foundation::{Error, ErrorContext, ErrorKind};
use entigen_model::Model;
use thiserror::Error as ThisError;
use tracing::info;

/// Result alias for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A failure anywhere in the pipeline.
///
/// Compile errors and backend errors stay in separate channels.
#[derive(Debug, ThisError)]
pub enum DriverError {
    /// Loading, compiling, or writing failed.
    #[error(transparent)]
    Compile(#[from] Error),
    /// The backend aborted the run.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The backends selectable by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Language-neutral interface outline.
    #[default]
    Outline,
    /// Grant manifest for the executable memory store.
    Memory,
}

impl BackendKind {
    /// Every backend, in listing order.
    pub const ALL: [BackendKind; 2] = [BackendKind::Outline, BackendKind::Memory];

    /// Returns the backend's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Outline => "outline",
            Self::Memory => "memory",
        }
    }

    /// Looks a backend up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    fn generator(self) -> Box<dyn Generator> {
        match self {
            Self::Outline => Box::new(OutlineBackend::new()),
            Self::Memory => Box::new(MemoryBackend::new()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the model name for a schema path: its file stem.
#[must_use]
pub fn model_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "model".to_string())
}

/// Reads and compiles a schema file.
///
/// The returned error carries the file name and the failing stage.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not compile.
pub fn compile_file(path: &Path) -> entigen_foundation::Result<Model> {
    let context = ErrorContext::new().with_source(path.display().to_string());
    let source = fs::read_to_string(path).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to read schema '{}': {e}",
            path.display()
        )))
        .with_context(context.clone().with_stage("load"))
    })?;
    entigen_model::compile(&model_name(path), &source)
        .map_err(|e| e.with_context(context.with_stage("compile")))
}

/// Writes an artifact into `dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_artifact(dir: &Path, artifact: &Artifact) -> entigen_foundation::Result<PathBuf> {
    let context = ErrorContext::new().with_stage("write");
    fs::create_dir_all(dir).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to create directory '{}': {e}",
            dir.display()
        )))
        .with_context(context.clone())
    })?;
    let path = dir.join(&artifact.name);
    fs::write(&path, &artifact.contents).map_err(|e| {
        Error::new(ErrorKind::Io(format!(
            "failed to write artifact '{}': {e}",
            path.display()
        )))
        .with_context(context.clone().with_source(path.display().to_string()))
    })?;
    info!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
    Ok(path)
}

/// What a full pipeline run produced.
#[derive(Debug)]
pub struct Outcome {
    /// The compiled model.
    pub model: Model,
    /// The generation report.
    pub report: Report,
    /// Where the artifact was written.
    pub path: PathBuf,
}

/// Runs the pipeline with one backend and one generator configuration.
#[derive(Clone, Debug, Default)]
pub struct Driver {
    backend: BackendKind,
    config: GeneratorConfig,
}

impl Driver {
    /// Creates a driver for `backend` with the default configuration.
    #[must_use]
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            config: GeneratorConfig::new(),
        }
    }

    /// Replaces the generator configuration.
    #[must_use]
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the selected backend.
    #[must_use]
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Returns the generator configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Runs the selected backend over a compiled model.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend aborts the run.
    pub fn generate(&self, model: &Model) -> DriverResult<Report> {
        let mut generator = self.backend.generator();
        let report = Orchestrator::new(model, self.config.clone()).run(generator.as_mut())?;
        Ok(report)
    }

    /// Compiles `input`, generates, and writes the artifact into `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first compile, backend, or write error.
    pub fn run(&self, input: &Path, output_dir: &Path) -> DriverResult<Outcome> {
        let model = compile_file(input)?;
        let report = self.generate(&model)?;
        let path = write_artifact(output_dir, &report.artifact)?;
        info!(
            backend = %self.backend,
            failures = report.failures.len(),
            "pipeline finished"
        );
        Ok(Outcome { model, report, path })
    }
}
