//! Profile-key detection for a project root.
//!
//! The engine itself treats detection as an opaque collaborator: anything
//! implementing [`ProfileDetector`] may drive which overlay gets merged.
//! The bundled [`ManifestProfileDetector`] inspects the project's
//! `package.json` dependency tables first (the most reliable signal), then
//! falls back to well-known framework config files at the root.
//!
//! Detection is best-effort: a malformed manifest or an unreadable root
//! yields `None`, never an error, and the caller simply keeps the base
//! document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// Detects the technology profile of a project root.
pub trait ProfileDetector {
    /// Returns the profile key (e.g. `"Next.js"`) or `None` when the project
    /// matches nothing known.
    fn detect(&self, project_root: &Path) -> Option<String>;
}

/// Dependency-key / profile pairs, checked in priority order.
///
/// `react` must come after `next` and `react-native`: those frameworks pull
/// `react` in as a transitive dependency and would otherwise be shadowed.
const DEPENDENCY_PROFILES: [(&str, &str); 8] = [
    ("next", "Next.js"),
    ("react-native", "React Native"),
    ("@angular/core", "Angular"),
    ("vue", "Vue"),
    ("react", "React"),
    ("svelte", "Svelte"),
    ("@nestjs/core", "Nest.js"),
    ("express", "Express"),
];

/// Config-file / profile pairs checked when no dependency matched.
const CONFIG_FILE_PROFILES: [(&str, &str); 8] = [
    ("next.config.js", "Next.js"),
    ("angular.json", "Angular"),
    ("vue.config.js", "Vue"),
    ("svelte.config.js", "Svelte"),
    ("metro.config.js", "React Native"),
    ("app.json", "React Native"),
    ("react-native.config.js", "React Native"),
    ("nest-cli.json", "Nest.js"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Default detector: `package.json` dependencies, then config files.
#[derive(Debug, Clone, Default)]
pub struct ManifestProfileDetector;

impl ProfileDetector for ManifestProfileDetector {
    fn detect(&self, project_root: &Path) -> Option<String> {
        if let Some(profile) = detect_from_dependencies(project_root) {
            debug!("profile '{profile}' detected from dependencies");
            return Some(profile);
        }
        let profile = detect_from_config_files(project_root);
        if let Some(profile) = &profile {
            debug!("profile '{profile}' detected from config files");
        }
        profile
    }
}

fn detect_from_dependencies(project_root: &Path) -> Option<String> {
    let manifest_path = project_root.join("package.json");
    let text = std::fs::read_to_string(&manifest_path).ok()?;
    let manifest: ProjectManifest = match serde_json::from_str(&text) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!("unparseable project manifest at {}: {e}", manifest_path.display());
            return None;
        }
    };

    DEPENDENCY_PROFILES
        .iter()
        .find(|(dependency, _)| {
            manifest.dependencies.contains_key(*dependency)
                || manifest.dev_dependencies.contains_key(*dependency)
        })
        .map(|(_, profile)| profile.to_string())
}

fn detect_from_config_files(project_root: &Path) -> Option<String> {
    CONFIG_FILE_PROFILES
        .iter()
        .find(|(filename, _)| project_root.join(filename).exists())
        .map(|(_, profile)| profile.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
