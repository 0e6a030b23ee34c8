//! Storage infrastructure: the live configuration slot and its backups.
//!
//! The live slot is the single piece of persisted state the host editor
//! reads.  Three sibling files support it, derived by suffix:
//!
//! - `<live>.backup`   – stable backup, the oldest known-good snapshot,
//!   seeded once and used as the last-resort recovery source;
//! - `<live>.previous` – snapshot of the immediately prior commit,
//!   refreshed before each write;
//! - `<live>.temp`     – staging file, existing only transiently while a
//!   commit validates its payload.
//!
//! Only [`writer::DurableWriter`] and [`recovery::RecoveryManager`] write the
//! live slot; everything else treats it as read-only.

pub mod loader;
pub mod recovery;
pub mod writer;

use std::path::{Path, PathBuf};

use thiserror::Error;

use iconforge_core::{parse_document, InvalidReason, Parsed, ThemeDocument};

/// Error type for live-slot storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document file does not exist.  Always recoverable via a fallback
    /// tier.
    #[error("no document at {0}")]
    NotFound(PathBuf),

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but its content does not decode into a document.
    #[error("unparseable document at {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    /// The file decodes but violates a structural invariant (dangling icon
    /// references).  Triggers recovery; never committed.
    #[error("structurally invalid document at {path}: {reason}")]
    Structural { path: PathBuf, reason: InvalidReason },

    /// A staging write or the atomic replace failed.  The live slot is
    /// guaranteed unmodified by the failed attempt.
    #[error("commit failed at {path}: {detail}")]
    WriteFailure { path: PathBuf, detail: String },
}

/// The live slot path and its derived backup/staging siblings.
#[derive(Debug, Clone)]
pub struct SlotPaths {
    live: PathBuf,
}

impl SlotPaths {
    pub fn new(live: PathBuf) -> Self {
        Self { live }
    }

    /// The path the host editor reads.
    pub fn live(&self) -> &Path {
        &self.live
    }

    /// `<live>.backup`: stable backup.
    pub fn stable_backup(&self) -> PathBuf {
        with_suffix(&self.live, ".backup")
    }

    /// `<live>.previous`: immediately prior commit.
    pub fn previous_backup(&self) -> PathBuf {
        with_suffix(&self.live, ".previous")
    }

    /// `<live>.temp`: transient staging file.
    pub fn staging(&self) -> PathBuf {
        with_suffix(&self.live, ".temp")
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut full = path.as_os_str().to_os_string();
    full.push(suffix);
    PathBuf::from(full)
}

/// Reads and fully validates the document at `path`.
pub fn read_document(path: &Path) -> Result<ThemeDocument, StorageError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    match parse_document(&text) {
        Parsed::Valid(doc) => Ok(doc),
        Parsed::Invalid(InvalidReason::Malformed(detail)) => Err(StorageError::Parse {
            path: path.to_path_buf(),
            detail,
        }),
        Parsed::Invalid(reason) => Err(StorageError::Structural {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
