//! Base-document loading with ordered fallback.
//!
//! Loading never fails.  Candidate sources are tried in a fixed order and
//! every failure (absent file, unreadable file, malformed JSON, dangling
//! references) degrades to the next tier:
//!
//! 1. `<assets_root>/icons/theme-base.json` (primary);
//! 2. `<assets_root>/theme-base.json` (alternate at the root);
//! 3. the theme path embedded in the packaging manifest;
//! 4. a synthesized minimal document.
//!
//! Whatever tier wins, the result is color-normalized and path-repaired
//! before it is returned, so callers always hold a document that satisfies
//! the styling invariants and has been reconciled with the disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use iconforge_core::{
    normalize, IconDefinition, ThemeDocument, FILE_KEY, FOLDER_KEY, FOLDER_OPEN_KEY,
};

use crate::infrastructure::manifest;
use crate::infrastructure::resolve::{repair_document, PathResolver};
use crate::infrastructure::storage::{read_document, StorageError};

/// Primary base-document location, relative to the assets root.
pub const BASE_DOCUMENT_PRIMARY: &str = "icons/theme-base.json";
/// Alternate base-document location at the assets root.
pub const BASE_DOCUMENT_ALTERNATE: &str = "theme-base.json";

/// Loads the base document for an assets root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    assets_root: PathBuf,
    resolver: PathResolver,
}

impl ConfigLoader {
    pub fn new(assets_root: PathBuf, resolver: PathResolver) -> Self {
        Self {
            assets_root,
            resolver,
        }
    }

    /// Produces a normalized, repaired base document.  Never fails.
    pub fn load(&self) -> ThemeDocument {
        let mut doc = normalize(&self.load_base());
        let report = repair_document(&mut doc, &self.assets_root, &self.resolver);
        if !report.is_clean() {
            warn!(
                "{} asset path(s) could not be repaired; left as declared",
                report.unresolved.len()
            );
        }
        doc
    }

    fn load_base(&self) -> ThemeDocument {
        let candidates = [
            self.assets_root.join(BASE_DOCUMENT_PRIMARY),
            self.assets_root.join(BASE_DOCUMENT_ALTERNATE),
        ];
        for candidate in &candidates {
            if let Some(doc) = self.try_source(candidate) {
                return doc;
            }
        }

        if let Some(embedded) = manifest::embedded_theme_path(&self.assets_root) {
            if let Some(doc) = self.try_source(&embedded) {
                return doc;
            }
        }

        info!("no usable base document found; synthesizing the minimal default");
        self.minimal_document()
    }

    fn try_source(&self, path: &Path) -> Option<ThemeDocument> {
        match read_document(path) {
            Ok(doc) => {
                info!("base document loaded from {}", path.display());
                Some(doc)
            }
            Err(StorageError::NotFound(_)) => {
                debug!("no base document at {}", path.display());
                None
            }
            Err(e) => {
                warn!("unusable base document: {e}");
                None
            }
        }
    }

    /// Hand-built smallest valid document.
    ///
    /// Base-role assets are referenced only if they exist at their well-known
    /// locations; a `js`/`json` pair is included so the synthesized theme
    /// does something visible in a typical project.
    pub fn minimal_document(&self) -> ThemeDocument {
        let mut doc = ThemeDocument {
            icon_definitions: Default::default(),
            file_role: FILE_KEY.to_string(),
            folder_role: FOLDER_KEY.to_string(),
            folder_expanded_role: FOLDER_OPEN_KEY.to_string(),
            extension_bindings: Default::default(),
            filename_bindings: Default::default(),
            language_bindings: Default::default(),
            light: None,
            high_contrast: None,
        };

        let base_roles = [
            (FILE_KEY, "icons/file.svg", "#cccccc"),
            (FOLDER_KEY, "icons/folder.svg", "#7ca1c0"),
            (FOLDER_OPEN_KEY, "icons/folder-open.svg", "#7ca1c0"),
        ];
        for (key, relative, color) in base_roles {
            doc.icon_definitions.insert(
                key.to_string(),
                IconDefinition {
                    asset_path: self.existing_or_empty(relative),
                    style_color: Some(color.to_string()),
                    glyph: None,
                },
            );
        }

        doc.icon_definitions.insert(
            "js".to_string(),
            IconDefinition {
                asset_path: "./icons/js.svg".to_string(),
                style_color: Some("#cbcb41".to_string()),
                glyph: None,
            },
        );
        doc.icon_definitions.insert(
            "json".to_string(),
            IconDefinition {
                asset_path: "./icons/json.svg".to_string(),
                style_color: Some("#f1e05a".to_string()),
                glyph: None,
            },
        );
        doc.extension_bindings
            .insert("js".to_string(), "js".to_string());
        doc.extension_bindings
            .insert("json".to_string(), "json".to_string());
        doc.language_bindings
            .insert("javascript".to_string(), "js".to_string());
        doc.language_bindings
            .insert("json".to_string(), "json".to_string());

        doc
    }

    fn existing_or_empty(&self, relative: &str) -> String {
        if self.assets_root.join(relative).exists() {
            format!("./{relative}")
        } else {
            String::new()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
