//! Document synthesis: base + optional profile overlay, fully repaired.
//!
//! This is the read side of the engine.  It builds the effective document
//! for a profile key without touching the live slot; committing the result
//! is a separate, explicitly invoked step.

use std::path::Path;

use tracing::info;

use iconforge_core::{merge, normalize, overlay_identifier, ThemeDocument};

use crate::infrastructure::overlay::OverlayProvider;
use crate::infrastructure::resolve::{repair_document, PathResolver};
use crate::infrastructure::storage::loader::ConfigLoader;

/// Produces the effective document for `profile_key`.
///
/// The base document comes out of the loader already normalized and
/// repaired.  When an overlay applies, the merged result is normalized and
/// repaired again: overlay entries may arrive uncolored and their asset
/// paths are relative to the same assets root as the base.
pub fn synthesize_document(
    loader: &ConfigLoader,
    resolver: &PathResolver,
    assets_root: &Path,
    overlays: &dyn OverlayProvider,
    profile_key: Option<&str>,
) -> ThemeDocument {
    let base = loader.load();

    let Some(key) = profile_key else {
        return base;
    };
    let identifier = overlay_identifier(key);
    let Some(overlay) = overlays.lookup(&identifier) else {
        info!("no overlay for profile '{key}' (identifier '{identifier}'); keeping base document");
        return base;
    };

    info!("layering overlay '{identifier}' over base document");
    let mut merged = normalize(&merge(&base, &overlay));
    repair_document(&mut merged, assets_root, resolver);
    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────
