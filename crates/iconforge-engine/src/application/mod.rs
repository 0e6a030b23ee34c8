//! Application layer use cases for the theme engine.
//!
//! Use cases in this layer orchestrate the pure document algebra from
//! `iconforge-core` and the file-system adapters from `infrastructure` to
//! fulfil one caller goal each:
//!
//! - **`synthesize`** – Builds the effective document for a profile key:
//!   load the base, layer an overlay if one exists, repair asset paths.
//!
//! - **`refresh`** – The trigger-side state: an explicit cooldown guard owned
//!   by the caller, plus the typed outcome of one refresh attempt.  Keeping
//!   the guard out of the service means two hosts embedding the engine never
//!   share hidden module state.
//!
//! - **`service`** – [`service::ThemeService`], the single facade the host
//!   (or the CLI binary) talks to: `synthesize`, `commit`, `ensure_valid`,
//!   `refresh`, `reset`.

pub mod refresh;
pub mod service;
pub mod synthesize;
