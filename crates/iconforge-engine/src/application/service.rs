//! The engine facade: one service wiring the document pipeline together.
//!
//! [`ThemeService`] owns the loader, resolver, writer, and recovery manager
//! plus the two pluggable collaborators (overlay provider, profile
//! detector), and exposes the complete surface a host needs:
//! `synthesize`, `commit`, `ensure_valid`, `refresh`, `reset`.
//!
//! Construction is explicit: everything the engine used to treat as ambient
//! (live slot path, assets root, search exclusions) arrives in an
//! [`EngineConfig`] value, so embedding two engines with different roots in
//! one process is unremarkable.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use iconforge_core::ThemeDocument;

use crate::application::refresh::{RefreshGuard, RefreshOutcome};
use crate::application::synthesize::synthesize_document;
use crate::infrastructure::detect::{ManifestProfileDetector, ProfileDetector};
use crate::infrastructure::manifest;
use crate::infrastructure::overlay::{FsOverlayProvider, OverlayProvider};
use crate::infrastructure::resolve::{PathResolver, DEFAULT_EXCLUDED_DIRS};
use crate::infrastructure::storage::loader::ConfigLoader;
use crate::infrastructure::storage::recovery::RecoveryManager;
use crate::infrastructure::storage::writer::DurableWriter;
use crate::infrastructure::storage::{SlotPaths, StorageError};

/// All construction-time settings for a [`ThemeService`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory containing `icons/`, overlays, and the packaging manifest.
    pub assets_root: PathBuf,
    /// The document path the host editor reads.
    pub live_slot: PathBuf,
    /// Directory basenames the asset search must not enter.
    pub excluded_search_dirs: Vec<String>,
}

impl EngineConfig {
    /// Builds a config for `assets_root`, taking the live slot from the
    /// packaging manifest when it declares one.
    pub fn discover(assets_root: PathBuf) -> Self {
        let live_slot = manifest::live_slot_path(&assets_root);
        Self {
            assets_root,
            live_slot,
            excluded_search_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Facade over synthesis, durable persistence, and recovery.
pub struct ThemeService {
    assets_root: PathBuf,
    resolver: PathResolver,
    loader: ConfigLoader,
    writer: DurableWriter,
    recovery: RecoveryManager,
    overlays: Box<dyn OverlayProvider>,
    detector: Box<dyn ProfileDetector>,
}

impl ThemeService {
    /// Wires the default filesystem collaborators for `config`.
    pub fn new(config: EngineConfig) -> Self {
        let overlays = Box::new(FsOverlayProvider::new(
            config.assets_root.join("icons").join("frameworks"),
        ));
        let detector = Box::new(ManifestProfileDetector);
        Self::with_collaborators(config, overlays, detector)
    }

    /// Full-control constructor for hosts (and tests) substituting their own
    /// overlay store or detection heuristic.
    pub fn with_collaborators(
        config: EngineConfig,
        overlays: Box<dyn OverlayProvider>,
        detector: Box<dyn ProfileDetector>,
    ) -> Self {
        let resolver = PathResolver::new(config.excluded_search_dirs.clone());
        let loader = ConfigLoader::new(config.assets_root.clone(), resolver.clone());
        let paths = SlotPaths::new(config.live_slot.clone());
        let writer = DurableWriter::new(paths.clone());
        let recovery = RecoveryManager::new(paths, loader.clone());
        Self {
            assets_root: config.assets_root,
            resolver,
            loader,
            writer,
            recovery,
            overlays,
            detector,
        }
    }

    /// Builds the effective document for `profile_key` without committing.
    pub fn synthesize(&self, profile_key: Option<&str>) -> ThemeDocument {
        synthesize_document(
            &self.loader,
            &self.resolver,
            &self.assets_root,
            self.overlays.as_ref(),
            profile_key,
        )
    }

    /// Commits `doc` to the live slot through the staged protocol.
    ///
    /// On a validation failure of the staged payload the recovery path runs
    /// (it acts only if the live slot is actually unusable, so a healthy
    /// slot is never clobbered).  Returns `false` on any failure.
    pub fn commit(&self, doc: &ThemeDocument) -> bool {
        match self.writer.commit(doc) {
            Ok(()) => true,
            Err(e) => {
                error!("commit rejected: {e}");
                if matches!(e, StorageError::Structural { .. }) {
                    let _ = self.recovery.ensure_valid();
                }
                false
            }
        }
    }

    /// Startup/validation entry point; see
    /// [`RecoveryManager::ensure_valid`].
    pub fn ensure_valid(&self) -> bool {
        self.recovery.ensure_valid()
    }

    /// Detects a profile for `project_root` and, if one is found, commits a
    /// freshly synthesized document.  `force` bypasses the cooldown (the
    /// explicit-command path); unforced triggers are rate-limited by
    /// `guard`.
    pub fn refresh(
        &self,
        guard: &mut RefreshGuard,
        project_root: &Path,
        force: bool,
    ) -> RefreshOutcome {
        if !force && !guard.ready() {
            info!("refresh suppressed by cooldown");
            return RefreshOutcome::CoolingDown;
        }

        let Some(profile) = self.detector.detect(project_root) else {
            info!("no profile detected for {}", project_root.display());
            return RefreshOutcome::NoProfile;
        };

        info!("profile '{profile}' detected, synthesizing document");
        let doc = self.synthesize(Some(&profile));
        if self.commit(&doc) {
            guard.record();
            RefreshOutcome::Updated { profile }
        } else {
            RefreshOutcome::Failed
        }
    }

    /// Commits the profile-free document: the "reset to defaults" command.
    pub fn reset(&self) -> bool {
        let doc = self.synthesize(None);
        self.commit(&doc)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use iconforge_core::OverlayDocument;

    /// Hand-written detector stub returning a fixed profile.
    struct FixedProfile(Option<&'static str>);

    impl ProfileDetector for FixedProfile {
        fn detect(&self, _project_root: &Path) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    struct NoOverlays;

    impl OverlayProvider for NoOverlays {
        fn lookup(&self, _identifier: &str) -> Option<OverlayDocument> {
            None
        }
    }

    fn service_in(dir: &Path, profile: Option<&'static str>) -> ThemeService {
        let config = EngineConfig {
            assets_root: dir.to_path_buf(),
            live_slot: dir.join("theme.json"),
            excluded_search_dirs: vec!["node_modules".to_string()],
        };
        ThemeService::with_collaborators(config, Box::new(NoOverlays), Box::new(FixedProfile(profile)))
    }

    #[test]
    fn test_refresh_commits_when_profile_detected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), Some("Vue"));
        let mut guard = RefreshGuard::default();

        let outcome = service.refresh(&mut guard, dir.path(), false);

        assert_eq!(
            outcome,
            RefreshOutcome::Updated {
                profile: "Vue".to_string()
            }
        );
        assert!(dir.path().join("theme.json").exists());
        // A successful refresh arms the cooldown.
        assert!(!guard.ready());
    }

    #[test]
    fn test_refresh_reports_no_profile_without_committing() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None);
        let mut guard = RefreshGuard::default();

        let outcome = service.refresh(&mut guard, dir.path(), false);

        assert_eq!(outcome, RefreshOutcome::NoProfile);
        assert!(!dir.path().join("theme.json").exists());
    }

    #[test]
    fn test_refresh_respects_cooldown_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), Some("Vue"));
        let mut guard = RefreshGuard::new(Duration::from_secs(3600));
        guard.record();

        assert_eq!(
            service.refresh(&mut guard, dir.path(), false),
            RefreshOutcome::CoolingDown
        );
        assert!(matches!(
            service.refresh(&mut guard, dir.path(), true),
            RefreshOutcome::Updated { .. }
        ));
    }

    #[test]
    fn test_reset_commits_profile_free_document() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), Some("Vue"));

        assert!(service.reset());

        let live = std::fs::read_to_string(dir.path().join("theme.json")).unwrap();
        assert!(iconforge_core::parse_document(&live).is_valid());
    }

    #[test]
    fn test_ensure_valid_creates_live_slot_from_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None);

        assert!(service.ensure_valid());
        assert!(dir.path().join("theme.json").exists());
    }
}
