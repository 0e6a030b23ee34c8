//! Packaging-metadata reader.
//!
//! The assets root is packaged with a `package.json` manifest whose
//! `contributes.iconThemes` section declares where the host editor expects
//! the live theme document.  This module extracts that path; everything else
//! in the manifest is irrelevant here and ignored.
//!
//! A missing or malformed manifest is an expected condition (the loader has
//! further fallback tiers), so every failure degrades to `None` with a log
//! line instead of an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

/// Manifest filename at the assets root.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Live-slot filename used when the manifest declares no theme path.
pub const DEFAULT_LIVE_SLOT: &str = "theme.json";

#[derive(Debug, Default, Deserialize)]
struct PackagingManifest {
    #[serde(default)]
    contributes: Contributes,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Contributes {
    #[serde(default)]
    icon_themes: Vec<IconThemeEntry>,
}

#[derive(Debug, Deserialize)]
struct IconThemeEntry {
    path: String,
}

/// Returns the theme-document path declared by the packaging manifest,
/// resolved against the assets root.
pub fn embedded_theme_path(assets_root: &Path) -> Option<PathBuf> {
    let manifest_path = assets_root.join(MANIFEST_FILENAME);
    let text = match std::fs::read_to_string(&manifest_path) {
        Ok(text) => text,
        Err(e) => {
            debug!("no readable manifest at {}: {e}", manifest_path.display());
            return None;
        }
    };
    let manifest: PackagingManifest = match serde_json::from_str(&text) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("malformed manifest at {}: {e}", manifest_path.display());
            return None;
        }
    };
    let entry = manifest.contributes.icon_themes.into_iter().next()?;
    Some(assets_root.join(entry.path))
}

/// Resolves the live configuration slot for an assets root: the
/// manifest-declared theme path when present, the fixed default otherwise.
pub fn live_slot_path(assets_root: &Path) -> PathBuf {
    match embedded_theme_path(assets_root) {
        Some(path) => {
            debug!("live slot from manifest: {}", path.display());
            path
        }
        None => assets_root.join(DEFAULT_LIVE_SLOT),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
