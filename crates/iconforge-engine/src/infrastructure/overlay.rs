//! Overlay lookup: resolving a profile identifier to an overlay document.
//!
//! Overlays live as standalone JSON files named after the profile slug
//! (`next-js.json`, `react-native.json`, ...) inside a frameworks directory.
//! An absent overlay is the common case (most profiles ship no overrides),
//! so lookup returns an `Option` and only a *malformed* overlay file is worth
//! a warning.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use iconforge_core::OverlayDocument;

/// Resolves a profile identifier to an overlay, if one exists.
///
/// The engine depends on this trait so tests (and hosts with non-filesystem
/// overlay stores) can substitute their own implementation.
pub trait OverlayProvider {
    fn lookup(&self, identifier: &str) -> Option<OverlayDocument>;
}

/// Reads overlays from `<frameworks_dir>/<identifier>.json`.
#[derive(Debug, Clone)]
pub struct FsOverlayProvider {
    frameworks_dir: PathBuf,
}

impl FsOverlayProvider {
    pub fn new(frameworks_dir: PathBuf) -> Self {
        Self { frameworks_dir }
    }
}

impl OverlayProvider for FsOverlayProvider {
    fn lookup(&self, identifier: &str) -> Option<OverlayDocument> {
        let path = self.frameworks_dir.join(format!("{identifier}.json"));
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no overlay at {}", path.display());
                return None;
            }
            Err(e) => {
                warn!("unreadable overlay at {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str::<OverlayDocument>(&text) {
            Ok(overlay) => {
                info!(
                    "overlay '{identifier}' loaded ({} definition(s))",
                    overlay.icon_definitions.len()
                );
                Some(overlay)
            }
            Err(e) => {
                warn!("malformed overlay at {}: {e}", path.display());
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
