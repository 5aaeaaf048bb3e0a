//! Model snapshots in `MessagePack`.
//!
//! A compiled [`Model`] can be written out and loaded back without
//! recompiling its schema. Snapshots use named encoding so struct field
//! names survive.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use entigen_foundation::{Error, ErrorKind, Result};
use entigen_model::Model;

/// Serializes a model to bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(model: &Model) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(model).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

/// Deserializes a model from bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a model snapshot.
pub fn from_bytes(bytes: &[u8]) -> Result<Model> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::new(ErrorKind::Serialization(e.to_string())))
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> Error {
    Error::new(ErrorKind::Io(format!(
        "failed to {action} '{}': {e}",
        path.display()
    )))
}

/// Saves a model snapshot, overwriting any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written or serialization fails.
pub fn save_to_file<P: AsRef<Path>>(model: &Model, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(model)?;
    let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to file", path, &e))?;
    writer.flush().map_err(|e| io_error("flush file", path, &e))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "saved model snapshot");
    Ok(())
}

/// Loads a model snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open file", path, &e))?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read file", path, &e))?;

    from_bytes(&bytes)
}
