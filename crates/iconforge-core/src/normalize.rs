//! Styling normalization for theme documents.
//!
//! Two rules, applied to every icon definition:
//!
//! 1. Definitions outside the three reserved base-role keys must carry a
//!    non-empty `styleColor`; absent or empty colors get the default accent.
//! 2. Glyph-based definitions must always carry a color, even for base-role
//!    keys: a glyph renders as text, and an uncolored glyph is invisible on
//!    some editor themes.
//!
//! Normalization is pure: the input is never mutated and applying the
//! function twice yields the same document as applying it once.
//!
//! Asset-path repair is *not* done here; it needs the file system and lives
//! in the engine's resolver, which runs right after normalization in the
//! loading pipeline.

use crate::document::ThemeDocument;

/// Default accent color assigned to definitions that carry none.
pub const DEFAULT_ACCENT_COLOR: &str = "#519aba";

/// Reserved icon key for the plain-file role.
pub const FILE_KEY: &str = "_file";
/// Reserved icon key for the collapsed-folder role.
pub const FOLDER_KEY: &str = "_folder";
/// Reserved icon key for the expanded-folder role.
pub const FOLDER_OPEN_KEY: &str = "_folder_open";

/// The three reserved base-role keys exempt from the color requirement.
pub const BASE_ROLE_KEYS: [&str; 3] = [FILE_KEY, FOLDER_KEY, FOLDER_OPEN_KEY];

fn is_base_role(key: &str) -> bool {
    BASE_ROLE_KEYS.contains(&key)
}

/// Returns a copy of `doc` with the color rules applied.
pub fn normalize(doc: &ThemeDocument) -> ThemeDocument {
    let mut normalized = doc.clone();
    for (key, definition) in &mut normalized.icon_definitions {
        let has_color = definition
            .style_color
            .as_deref()
            .is_some_and(|c| !c.is_empty());
        if has_color {
            continue;
        }
        if !is_base_role(key) || definition.glyph.is_some() {
            definition.style_color = Some(DEFAULT_ACCENT_COLOR.to_string());
        }
    }
    normalized
}

// ── Tests ─────────────────────────────────────────────────────────────────────
