//! IconForge CLI entry point.
//!
//! Thin command wrapper over [`ThemeService`] for running the engine outside
//! a host editor: packaging pipelines regenerate the live document with
//! `generate`, and `verify` is useful as a post-install health check.
//!
//! ```text
//! iconforge generate [--assets <dir>] [--profile <key>]
//! iconforge reset    [--assets <dir>]
//! iconforge verify   [--assets <dir>]
//! iconforge detect   <project-root>
//! ```
//!
//! `--assets` defaults to the current directory.  Exit status is non-zero
//! when the requested operation reports failure.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::info;
use tracing_subscriber::EnvFilter;

use iconforge_engine::infrastructure::detect::{ManifestProfileDetector, ProfileDetector};
use iconforge_engine::{EngineConfig, ThemeService};

const USAGE: &str = "usage: iconforge <generate|reset|verify|detect> [options]

  generate [--assets <dir>] [--profile <key>]   synthesize and commit the document
  reset    [--assets <dir>]                     commit the profile-free default
  verify   [--assets <dir>]                     validate (and repair) the live slot
  detect   <project-root>                       print the detected profile key";

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!("{USAGE}");
    };

    match command.as_str() {
        "generate" => {
            let service = service_from_args(&args)?;
            let profile = flag_value(&args, "--profile")?;
            let doc = service.synthesize(profile.as_deref());
            if !service.commit(&doc) {
                bail!("commit failed; live slot left in its previous state");
            }
            info!("document generated");
        }
        "reset" => {
            if !service_from_args(&args)?.reset() {
                bail!("reset failed; live slot left in its previous state");
            }
            info!("document reset to defaults");
        }
        "verify" => {
            if !service_from_args(&args)?.ensure_valid() {
                bail!("live slot could not be made valid");
            }
            info!("live slot is valid");
        }
        "detect" => {
            let root = args
                .get(1)
                .map(PathBuf::from)
                .context("detect requires a project root argument")?;
            match ManifestProfileDetector.detect(&root) {
                Some(profile) => println!("{profile}"),
                None => println!("none"),
            }
        }
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }

    Ok(())
}

fn service_from_args(args: &[String]) -> anyhow::Result<ThemeService> {
    let assets = flag_value(args, "--assets")?
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok(ThemeService::new(EngineConfig::discover(assets)))
}

/// Returns the value following `flag`, if the flag is present.
fn flag_value(args: &[String], flag: &str) -> anyhow::Result<Option<String>> {
    match args.iter().position(|a| a == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.clone()))
            .with_context(|| format!("{flag} requires a value")),
    }
}
