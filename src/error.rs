use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported host OS '{0}' (supported: Linux, macOS)")]
    UnsupportedOs(String),

    #[error("invalid sha256 digest '{value}': {reason}")]
    InvalidDigest { value: String, reason: String },

    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid formula: {0}")]
    InvalidFormula(String),

    #[error("checksum mismatch expected {expected} got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("download of {url} failed: {status}")]
    Download { url: String, status: String },

    #[error("extracting {archive:?}: {source}")]
    Extract {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("archive entry escapes install root: {0:?}")]
    UnsafeArchiveEntry(PathBuf),

    #[error("extracted path not found: {0:?}")]
    ExtractedPathNotFound(PathBuf),

    #[error("refusing to replace non-symlink at {0:?}")]
    LinkConflict(PathBuf),

    #[error("symlinks are not supported on this platform")]
    SymlinkUnsupported,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T, E = InstallError> = std::result::Result<T, E>;
