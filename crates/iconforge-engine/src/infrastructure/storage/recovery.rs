//! Recovery of an absent or damaged live slot.
//!
//! `ensure_valid` is called at startup and whenever another component finds
//! the live slot unusable.  It degrades through three tiers:
//!
//! 1. copy the stable backup over the live slot (only if the backup itself
//!    validates; restoring known damage would just move the problem);
//! 2. synthesize a fresh document via the loader and commit it through the
//!    durable writer;
//! 3. write the hand-built minimal document directly, bypassing the staged
//!    protocol that just failed.
//!
//! Nothing here panics or returns an error: the function reports `false`
//! only when even tier 3's write fails, and in every other case leaves the
//! live slot structurally valid.

use std::fs;

use tracing::{debug, error, info, warn};

use iconforge_core::{parse_document, serialize_document, Parsed};

use crate::infrastructure::storage::loader::ConfigLoader;
use crate::infrastructure::storage::writer::DurableWriter;
use crate::infrastructure::storage::SlotPaths;

/// Restores or regenerates the live slot.
#[derive(Debug, Clone)]
pub struct RecoveryManager {
    paths: SlotPaths,
    loader: ConfigLoader,
    writer: DurableWriter,
}

enum LiveState {
    Valid,
    Missing,
    Damaged(String),
}

impl RecoveryManager {
    pub fn new(paths: SlotPaths, loader: ConfigLoader) -> Self {
        let writer = DurableWriter::new(paths.clone());
        Self {
            paths,
            loader,
            writer,
        }
    }

    /// Leaves the live slot parseable and structurally valid, restoring or
    /// regenerating it as needed.  Returns `false` only when every tier,
    /// including the direct minimal write, failed.
    pub fn ensure_valid(&self) -> bool {
        match self.live_state() {
            LiveState::Valid => {
                self.seed_stable_backup();
                true
            }
            LiveState::Missing => {
                info!("live slot missing; starting recovery");
                self.restore()
            }
            LiveState::Damaged(detail) => {
                warn!("live slot damaged ({detail}); starting recovery");
                self.restore()
            }
        }
    }

    fn live_state(&self) -> LiveState {
        let live = self.paths.live();
        let text = match fs::read_to_string(live) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LiveState::Missing,
            Err(e) => return LiveState::Damaged(format!("unreadable: {e}")),
        };
        match parse_document(&text) {
            Parsed::Valid(_) => LiveState::Valid,
            Parsed::Invalid(reason) => LiveState::Damaged(reason.to_string()),
        }
    }

    fn restore(&self) -> bool {
        if self.restore_from_stable_backup() {
            return true;
        }
        self.synthesize_replacement()
    }

    /// Tier 1: copy the stable backup over the live slot.  A copy, not a
    /// move: the backup must survive for a later recovery attempt.
    fn restore_from_stable_backup(&self) -> bool {
        let stable = self.paths.stable_backup();
        let text = match fs::read_to_string(&stable) {
            Ok(text) => text,
            Err(_) => {
                debug!("no stable backup at {}", stable.display());
                return false;
            }
        };
        if !parse_document(&text).is_valid() {
            warn!("stable backup at {} is itself invalid; skipping it", stable.display());
            return false;
        }
        match fs::copy(&stable, self.paths.live()) {
            Ok(_) => {
                info!("live slot restored from stable backup");
                true
            }
            Err(e) => {
                error!("could not restore from stable backup: {e}");
                false
            }
        }
    }

    /// Tier 2: full synthesis through the loader and the staged writer.
    fn synthesize_replacement(&self) -> bool {
        let doc = self.loader.load();
        match self.writer.commit(&doc) {
            Ok(()) => {
                info!("live slot regenerated from synthesized document");
                true
            }
            Err(e) => {
                error!("synthesized replacement failed to commit: {e}");
                self.write_minimal_directly()
            }
        }
    }

    /// Tier 3: the staged protocol itself is failing, so write the smallest
    /// valid document straight to the live slot.
    fn write_minimal_directly(&self) -> bool {
        let doc = self.loader.minimal_document();
        let text = match serialize_document(&doc) {
            Ok(text) => text,
            Err(e) => {
                error!("could not serialize minimal document: {e}");
                return false;
            }
        };
        let live = self.paths.live();
        if let Some(dir) = live.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match fs::write(live, text) {
            Ok(()) => {
                warn!("live slot replaced with the minimal emergency document");
                true
            }
            Err(e) => {
                error!("minimal document write failed, live slot stays damaged: {e}");
                false
            }
        }
    }

    /// A valid live slot with no stable backup is the oldest known-good
    /// state we will ever see; snapshot it.
    fn seed_stable_backup(&self) {
        let stable = self.paths.stable_backup();
        if stable.exists() {
            return;
        }
        match fs::copy(self.paths.live(), &stable) {
            Ok(_) => info!("stable backup seeded at {}", stable.display()),
            Err(e) => warn!("could not seed stable backup: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Filesystem scenarios for recovery (deleted live slot, truncated JSON,
// role-less documents, chained corruption) live in
// `tests/durability_integration.rs`; the unit tests here cover only the
// state classification.
