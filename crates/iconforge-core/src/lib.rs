//! # iconforge-core
//!
//! Shared library for IconForge containing the theme document model, the
//! structural validation rules, and the pure document transformations
//! (normalization and overlay merging).
//!
//! This crate is used by the engine crate and by any future host embedding.
//! It has zero dependencies on the file system, OS APIs, or the host editor.
//!
//! # Architecture overview (for beginners)
//!
//! An editor icon theme is a single JSON document that tells the editor which
//! image to show next to each file or folder in its explorer tree.  The
//! document maps symbolic icon keys (e.g. `"js"`) to asset definitions, and
//! then binds file extensions, exact filenames, and language identifiers to
//! those keys.  Three reserved roles (`fileRole`, `folderRole`,
//! `folderExpandedRole`) select the fallback icons.
//!
//! This crate (`iconforge-core`) is the pure foundation.  It defines:
//!
//! - **`document`** – The typed data model and the typed-variant parser.  A
//!   loaded document is either [`Parsed::Valid`] or [`Parsed::Invalid`];
//!   there is no half-parsed object to inspect field by field.
//!
//! - **`normalize`** – Styling invariants.  Every definition outside the
//!   three base roles must carry a color, and glyph-only definitions must
//!   carry one even for base roles.  Normalization is pure and idempotent.
//!
//! - **`merge`** – Overlay layering.  A profile overlay (e.g. for a detected
//!   framework) replaces colliding entries and preserves everything else;
//!   roles and variant roles are never touched by an overlay.
//!
//! Everything that touches a disk (loading, asset-path repair, durable
//! persistence, recovery) lives in `iconforge-engine`.

pub mod document;
pub mod merge;
pub mod normalize;

// Re-export the most-used types at the crate root so callers can write
// `iconforge_core::ThemeDocument` instead of the full module path.
pub use document::{
    parse_document, serialize_document, DanglingReference, IconDefinition, InvalidReason,
    OverlayDocument, Parsed, ThemeDocument, VariantRoles,
};
pub use merge::{merge, overlay_identifier};
pub use normalize::{
    normalize, BASE_ROLE_KEYS, DEFAULT_ACCENT_COLOR, FILE_KEY, FOLDER_KEY, FOLDER_OPEN_KEY,
};
