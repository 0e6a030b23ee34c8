//! Overlay merging: layering a profile-specific partial document over a base.
//!
//! Merging is additive-override.  Overlay entries replace base entries that
//! share a key; base entries absent from the overlay are preserved.  Roles
//! and variant roles belong to the base document alone and are never touched
//! by an overlay.
//!
//! Both inputs are borrowed and never mutated; the merge produces a fresh
//! document.

use crate::document::{OverlayDocument, ThemeDocument};

/// Derives the overlay identifier for an external profile key.
///
/// The identifier doubles as the overlay's filename stem, so it is
/// lower-cased with every whitespace character and dot replaced by a hyphen:
/// `"Next.js"` becomes `"next-js"`, `"React Native"` becomes
/// `"react-native"`.
pub fn overlay_identifier(profile_key: &str) -> String {
    profile_key
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() || c == '.' { '-' } else { c })
        .collect()
}

/// Layers `overlay` over `base` and returns the combined document.
pub fn merge(base: &ThemeDocument, overlay: &OverlayDocument) -> ThemeDocument {
    let mut merged = base.clone();
    merged.icon_definitions.extend(
        overlay
            .icon_definitions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    merged.extension_bindings.extend(
        overlay
            .extension_bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    merged.filename_bindings.extend(
        overlay
            .filename_bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    merged.language_bindings.extend(
        overlay
            .language_bindings
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::IconDefinition;
    use std::collections::BTreeMap;

    fn definition(path: &str) -> IconDefinition {
        IconDefinition {
            asset_path: path.to_string(),
            style_color: None,
            glyph: None,
        }
    }

    fn base_document() -> ThemeDocument {
        let mut icon_definitions = BTreeMap::new();
        icon_definitions.insert("_file".to_string(), definition("./icons/file.svg"));
        icon_definitions.insert("_folder".to_string(), definition("./icons/folder.svg"));
        icon_definitions.insert(
            "_folder_open".to_string(),
            definition("./icons/folder-open.svg"),
        );
        icon_definitions.insert("js".to_string(), definition("./icons/js.svg"));
        let mut extension_bindings = BTreeMap::new();
        extension_bindings.insert("js".to_string(), "js".to_string());
        ThemeDocument {
            icon_definitions,
            file_role: "_file".to_string(),
            folder_role: "_folder".to_string(),
            folder_expanded_role: "_folder_open".to_string(),
            extension_bindings,
            filename_bindings: BTreeMap::new(),
            language_bindings: BTreeMap::new(),
            light: None,
            high_contrast: None,
        }
    }

    // ── overlay_identifier ────────────────────────────────────────────────────

    #[test]
    fn test_overlay_identifier_replaces_dots() {
        assert_eq!(overlay_identifier("Next.js"), "next-js");
        assert_eq!(overlay_identifier("Nest.js"), "nest-js");
    }

    #[test]
    fn test_overlay_identifier_replaces_whitespace() {
        assert_eq!(overlay_identifier("React Native"), "react-native");
    }

    #[test]
    fn test_overlay_identifier_lowercases_plain_names() {
        assert_eq!(overlay_identifier("Angular"), "angular");
        assert_eq!(overlay_identifier("Express"), "express");
    }

    // ── merge ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_merge_overlay_replaces_colliding_definition() {
        let base = base_document();
        let mut overlay = OverlayDocument::default();
        overlay.icon_definitions.insert(
            "js".to_string(),
            definition("./icons/frameworks/next-js.svg"),
        );

        let merged = merge(&base, &overlay);

        assert_eq!(
            merged.icon_definitions["js"].asset_path,
            "./icons/frameworks/next-js.svg"
        );
    }

    #[test]
    fn test_merge_preserves_base_entries_absent_from_overlay() {
        let base = base_document();
        let mut overlay = OverlayDocument::default();
        overlay
            .icon_definitions
            .insert("vue".to_string(), definition("./icons/frameworks/vue.svg"));

        let merged = merge(&base, &overlay);

        assert_eq!(
            merged.icon_definitions["_file"].asset_path,
            "./icons/file.svg"
        );
        assert_eq!(merged.icon_definitions["js"].asset_path, "./icons/js.svg");
        assert!(merged.icon_definitions.contains_key("vue"));
    }

    #[test]
    fn test_merge_combines_binding_maps_with_overlay_priority() {
        let base = base_document();
        let mut overlay = OverlayDocument::default();
        overlay
            .extension_bindings
            .insert("js".to_string(), "next".to_string());
        overlay
            .extension_bindings
            .insert("vue".to_string(), "vue".to_string());
        overlay
            .filename_bindings
            .insert("next.config.js".to_string(), "next".to_string());
        overlay
            .language_bindings
            .insert("vue".to_string(), "vue".to_string());

        let merged = merge(&base, &overlay);

        assert_eq!(merged.extension_bindings["js"], "next");
        assert_eq!(merged.extension_bindings["vue"], "vue");
        assert_eq!(merged.filename_bindings["next.config.js"], "next");
        assert_eq!(merged.language_bindings["vue"], "vue");
    }

    #[test]
    fn test_merge_never_touches_roles_or_variants() {
        let mut base = base_document();
        base.light = Some(crate::document::VariantRoles {
            file_role: Some("_file".to_string()),
            folder_role: None,
            folder_expanded_role: None,
        });
        let mut overlay = OverlayDocument::default();
        overlay
            .icon_definitions
            .insert("_file".to_string(), definition("./other/file.svg"));

        let merged = merge(&base, &overlay);

        assert_eq!(merged.file_role, "_file");
        assert_eq!(merged.folder_role, "_folder");
        assert_eq!(merged.folder_expanded_role, "_folder_open");
        assert_eq!(merged.light, base.light);
        // The definition itself may be replaced; only the role *selection* is
        // out of the overlay's reach.
        assert_eq!(
            merged.icon_definitions["_file"].asset_path,
            "./other/file.svg"
        );
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let base = base_document();
        let base_before = base.clone();
        let mut overlay = OverlayDocument::default();
        overlay
            .icon_definitions
            .insert("js".to_string(), definition("./changed.svg"));
        let overlay_before = overlay.clone();

        let _ = merge(&base, &overlay);

        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn test_merge_with_empty_overlay_is_identity() {
        let base = base_document();
        let merged = merge(&base, &OverlayDocument::default());
        assert_eq!(merged, base);
    }
}
