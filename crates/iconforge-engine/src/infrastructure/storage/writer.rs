//! Durable commits to the live configuration slot.
//!
//! # Why stage-then-rename? (for beginners)
//!
//! Writing the live slot in place would leave a torn, unreadable file if the
//! process died mid-write, and the host editor reads this file on every
//! startup.  The writer therefore never touches the live slot directly.  It
//! writes the full payload to a sibling staging file, reads that file back
//! and re-validates it, and only then renames it over the live slot.  A
//! rename within one directory is atomic on every platform we care about, so
//! the live slot is always either the old document or the new one, never a
//! mixture and never absent.
//!
//! Protocol, in order:
//!
//! 1. refresh the backup cascade from the current live document;
//! 2. serialize and write `<live>.temp`;
//! 3. re-read `<live>.temp` and require a fully valid document; this is the
//!    sole gate that keeps invariant violations out of the live slot;
//! 4. rename `<live>.temp` over the live slot;
//! 5. report success.
//!
//! Any failure before step 4 deletes the staging file and leaves the live
//! slot byte-identical to its pre-commit state.

use std::fs;

use tracing::{error, info, warn};

use iconforge_core::{parse_document, serialize_document, Parsed, ThemeDocument};

use crate::infrastructure::storage::{SlotPaths, StorageError};

/// Commits documents to a live slot with staging and a backup cascade.
#[derive(Debug, Clone)]
pub struct DurableWriter {
    paths: SlotPaths,
}

impl DurableWriter {
    pub fn new(paths: SlotPaths) -> Self {
        Self { paths }
    }

    /// Runs the staged commit protocol for `doc`.
    ///
    /// # Errors
    ///
    /// [`StorageError::Structural`] when the staged payload fails validation
    /// (the caller should run recovery), [`StorageError::WriteFailure`] for
    /// staging or replace I/O failures.  In every error case the live slot
    /// is unmodified by this attempt.
    pub fn commit(&self, doc: &ThemeDocument) -> Result<(), StorageError> {
        self.refresh_backups();

        let live = self.paths.live();
        if let Some(dir) = live.parent() {
            fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        // Stage the serialized payload next to the live slot.
        let staging = self.paths.staging();
        let text = serialize_document(doc).map_err(|e| StorageError::WriteFailure {
            path: staging.clone(),
            detail: format!("serialization failed: {e}"),
        })?;
        fs::write(&staging, &text).map_err(|e| StorageError::WriteFailure {
            path: staging.clone(),
            detail: e.to_string(),
        })?;

        // Validate what actually landed on disk, not what we meant to write.
        let staged = match fs::read_to_string(&staging) {
            Ok(staged) => staged,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(StorageError::WriteFailure {
                    path: staging,
                    detail: format!("staged file unreadable: {e}"),
                });
            }
        };
        if let Parsed::Invalid(reason) = parse_document(&staged) {
            let _ = fs::remove_file(&staging);
            error!("staged document failed validation, live slot untouched: {reason}");
            return Err(StorageError::Structural {
                path: staging,
                reason,
            });
        }

        // Atomic replace: after this the new document is fully in place.
        fs::rename(&staging, live).map_err(|e| {
            let _ = fs::remove_file(&staging);
            StorageError::WriteFailure {
                path: live.to_path_buf(),
                detail: format!("atomic replace failed: {e}"),
            }
        })?;

        info!("document committed to {}", live.display());
        Ok(())
    }

    /// Step 1 of the protocol: seed the stable backup if it does not exist
    /// yet and refresh the previous-commit snapshot.
    ///
    /// Backup failures are logged, never fatal: a commit must not be
    /// blocked by an unwritable backup sibling.
    fn refresh_backups(&self) {
        let live = self.paths.live();
        if !live.exists() {
            return;
        }

        let stable = self.paths.stable_backup();
        if !stable.exists() {
            match fs::copy(live, &stable) {
                Ok(_) => info!("stable backup seeded at {}", stable.display()),
                Err(e) => warn!("could not seed stable backup: {e}"),
            }
        }

        let previous = self.paths.previous_backup();
        if let Err(e) = fs::copy(live, &previous) {
            warn!("could not refresh previous-commit snapshot: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
