use std::path::PathBuf;

use thiserror::Error;

use crate::colmap::ColmapError;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    /// A directory or file a stage depends on does not exist.
    #[error("{what} not found: {}", .path.display())]
    MissingPath { what: &'static str, path: PathBuf },

    /// The sparse directory lacks the binaries needed to load a reconstruction.
    #[error("missing COLMAP files in {}: {missing:?}", .dir.display())]
    MissingSparseFiles { dir: PathBuf, missing: Vec<String> },

    /// The external tool failed, including its fallback invocation.
    #[error("command failed: {command} ({reason})")]
    ToolFailed { command: String, reason: String },

    #[error("reconstruction error: {0}")]
    Colmap(#[from] ColmapError),

    #[error("failed to read npz archive: {0}")]
    ReadNpz(#[from] ndarray_npy::ReadNpzError),

    #[error("failed to write npy file: {0}")]
    WriteNpy(#[from] ndarray_npy::WriteNpyError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
