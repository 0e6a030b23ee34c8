//! iconforge-engine library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

// Re-export the embedding surface at the crate root so hosts can write
// `iconforge_engine::ThemeService` without spelling out the module path.
pub use application::refresh::{RefreshGuard, RefreshOutcome, DEFAULT_REFRESH_COOLDOWN};
pub use application::service::{EngineConfig, ThemeService};
