//! Asset-path resolution and repair.
//!
//! A loaded document frequently declares asset locations that no longer match
//! the disk: packaging moved a file, a hand-edited path lost its `./` prefix,
//! or an overlay was written against a different layout.  The resolver checks
//! each declared path against the document root and, when it is missing,
//! walks a small repair cascade:
//!
//! 1. the path as given;
//! 2. the path with a leading `./` stripped;
//! 3. the path with a leading `./` added;
//! 4. a filesystem search under the root for a file with the same basename
//!    (case-insensitive), skipping dependency-cache directories.
//!
//! The search is iterative and sorted (`walkdir` with `sort_by_file_name`),
//! so for an unchanged tree it always returns the same match.  When even the
//! search finds nothing the original value is kept and the failure is
//! reported through [`RepairReport`]: losing the caller's intent would be
//! worse than carrying a dangling path the editor simply ignores.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use iconforge_core::ThemeDocument;

/// Directory names never entered by the repair search.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 3] = ["node_modules", ".git", "target"];

/// Outcome of resolving one asset path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// The (possibly corrected) path to store in the document.
    pub path: String,
    /// `false` when the asset exists nowhere under the root and `path` is the
    /// caller's original value.
    pub found: bool,
}

/// Checks and repairs asset references relative to a document root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    /// Lower-cased directory basenames the search must not enter.
    excluded_dirs: Vec<String>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect())
    }
}

impl PathResolver {
    pub fn new(excluded_dirs: Vec<String>) -> Self {
        Self {
            excluded_dirs: excluded_dirs.into_iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// Resolves `asset_path` against `root`, repairing it when possible.
    ///
    /// The empty string is the "no asset" sentinel and is returned unchanged
    /// with `found: true`; there is nothing to look for.  Relative paths
    /// that resolve are normalized to begin with `./`.
    pub fn resolve(&self, asset_path: &str, root: &Path) -> ResolvedPath {
        if asset_path.is_empty() {
            return ResolvedPath {
                path: String::new(),
                found: true,
            };
        }

        let declared = Path::new(asset_path);
        if declared.is_absolute() {
            if declared.exists() {
                return ResolvedPath {
                    path: asset_path.to_string(),
                    found: true,
                };
            }
        } else {
            // The path as declared.
            if root.join(asset_path).exists() {
                return ResolvedPath {
                    path: dotted(asset_path),
                    found: true,
                };
            }
            // Leading `./` stripped, then added, whichever variant the
            // document did not already use.
            if let Some(stripped) = asset_path.strip_prefix("./") {
                if root.join(stripped).exists() {
                    return ResolvedPath {
                        path: dotted(stripped),
                        found: true,
                    };
                }
            } else {
                let with_dot = format!("./{asset_path}");
                if root.join(&with_dot).exists() {
                    return ResolvedPath {
                        path: with_dot,
                        found: true,
                    };
                }
            }
        }

        // Last resort: search the tree for the same basename.
        if let Some(filename) = declared.file_name() {
            let filename = filename.to_string_lossy();
            if let Some(hit) = self.search(root, &filename) {
                if let Ok(relative) = hit.strip_prefix(root) {
                    let corrected = format!("./{}", forward_slashes(relative));
                    debug!(
                        "asset '{asset_path}' relocated to '{corrected}' under {}",
                        root.display()
                    );
                    return ResolvedPath {
                        path: corrected,
                        found: true,
                    };
                }
            }
        }

        ResolvedPath {
            path: asset_path.to_string(),
            found: false,
        }
    }

    /// Depth-first search under `root` for a file whose basename matches
    /// `filename` case-insensitively.
    ///
    /// Excluded directories are pruned, never entered.  Entries are visited
    /// in file-name order, so the first match is stable for a fixed tree;
    /// the tie-break between same-named files at different depths is not
    /// part of the contract.
    pub fn search(&self, root: &Path, filename: &str) -> Option<PathBuf> {
        let target = filename.to_lowercase();
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && self.is_excluded(entry.file_name()))
            })
            .filter_map(Result::ok)
            .find(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().to_lowercase() == target
            })
            .map(|entry| entry.into_path())
    }

    fn is_excluded(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy().to_lowercase();
        self.excluded_dirs.iter().any(|d| *d == name)
    }
}

/// Ensures a relative path begins with a dot segment.
fn dotted(path: &str) -> String {
    if path.starts_with('.') {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// Renders a relative path with forward slashes regardless of platform.
fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

// ── Document-wide repair ──────────────────────────────────────────────────────

/// Result of repairing every asset path in a document.
///
/// `unresolved` entries are non-fatal: their paths were left exactly as the
/// document declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Icon keys whose asset path was rewritten.
    pub rewritten: Vec<String>,
    /// Icon keys whose asset exists nowhere under the root.
    pub unresolved: Vec<String>,
}

impl RepairReport {
    /// `true` when every non-empty asset path resolved.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Runs the resolver over every icon definition in `doc`, in place.
///
/// Repair completes before this function returns; the caller may treat the
/// document as normalized immediately afterwards.
pub fn repair_document(
    doc: &mut ThemeDocument,
    root: &Path,
    resolver: &PathResolver,
) -> RepairReport {
    let mut report = RepairReport::default();
    for (key, definition) in &mut doc.icon_definitions {
        if definition.asset_path.is_empty() {
            continue;
        }
        let resolved = resolver.resolve(&definition.asset_path, root);
        if resolved.found {
            if resolved.path != definition.asset_path {
                report.rewritten.push(key.clone());
                definition.asset_path = resolved.path;
            }
        } else {
            warn!(
                "asset for icon '{key}' not found anywhere under {}; keeping '{}'",
                root.display(),
                definition.asset_path
            );
            report.unresolved.push(key.clone());
        }
    }
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────────
