//! Theme document data model and typed-variant parsing.
//!
//! The persisted artifact is a single JSON object.  All maps are `BTreeMap`
//! so that serialization order is deterministic and committed documents diff
//! cleanly between runs.
//!
//! Parsing never produces a half-typed object: [`parse_document`] returns
//! [`Parsed::Valid`] only when the text decodes into a [`ThemeDocument`]
//! *and* every icon reference resolves inside `iconDefinitions`.  Anything
//! else is [`Parsed::Invalid`] with a reason the caller can log and react to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry in `iconDefinitions`.
///
/// `assetPath` may be empty: the empty string is the "no asset" sentinel and
/// is always serialized so a written document round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconDefinition {
    /// Location of the asset, relative to the document root (`./icons/x.svg`)
    /// or absolute.  Empty means the definition carries no asset.
    #[serde(default)]
    pub asset_path: String,
    /// Display color for the definition (e.g. `#519aba`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_color: Option<String>,
    /// Font glyph for glyph-based definitions.  Glyph-only entries must still
    /// carry a color after normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
}

/// Role overrides for a display variant (`light`, `highContrast`).
///
/// Variants re-specify only the three base roles; binding maps are shared
/// with the main document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRoles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_expanded_role: Option<String>,
}

/// The persisted theme document.
///
/// The three role fields are required: a document without them does not
/// decode and is reported as [`InvalidReason::Malformed`].  Binding maps
/// default to empty so partial documents from older writers still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDocument {
    /// Symbolic icon key -> asset definition.
    pub icon_definitions: BTreeMap<String, IconDefinition>,
    /// Icon key used for plain files.
    pub file_role: String,
    /// Icon key used for collapsed folders.
    pub folder_role: String,
    /// Icon key used for expanded folders.
    pub folder_expanded_role: String,
    /// File extension (no leading dot) -> icon key.
    #[serde(default)]
    pub extension_bindings: BTreeMap<String, String>,
    /// Exact filename -> icon key.
    #[serde(default)]
    pub filename_bindings: BTreeMap<String, String>,
    /// Language identifier -> icon key.
    #[serde(default)]
    pub language_bindings: BTreeMap<String, String>,
    /// Role overrides for light display variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<VariantRoles>,
    /// Role overrides for high-contrast display variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<VariantRoles>,
}

/// A partial document layered over a base by a profile overlay.
///
/// Overlays may add or replace icon definitions and bindings; they never
/// carry roles or variant roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayDocument {
    #[serde(default)]
    pub icon_definitions: BTreeMap<String, IconDefinition>,
    #[serde(default)]
    pub extension_bindings: BTreeMap<String, String>,
    #[serde(default)]
    pub filename_bindings: BTreeMap<String, String>,
    #[serde(default)]
    pub language_bindings: BTreeMap<String, String>,
}

/// An icon reference that does not resolve inside `iconDefinitions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Where the reference came from, in wire terms (`fileRole`,
    /// `extensionBindings.ts`, `light.folderRole`, ...).
    pub referrer: String,
    /// The icon key that has no definition.
    pub icon_key: String,
}

/// Why a document failed validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidReason {
    /// The text is not JSON, not an object, or misses a required field.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// The document decoded but references icon keys with no definition.
    #[error("{}", describe_dangling(.0))]
    DanglingReferences(Vec<DanglingReference>),
}

fn describe_dangling(refs: &[DanglingReference]) -> String {
    match refs.first() {
        Some(first) => format!(
            "{} dangling icon reference(s), first: {} -> {}",
            refs.len(),
            first.referrer,
            first.icon_key
        ),
        None => "dangling icon references".to_string(),
    }
}

/// Result of decoding document text: fully valid or diagnosed invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Valid(ThemeDocument),
    Invalid(InvalidReason),
}

impl Parsed {
    /// Returns the document if parsing and validation succeeded.
    pub fn into_valid(self) -> Option<ThemeDocument> {
        match self {
            Parsed::Valid(doc) => Some(doc),
            Parsed::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Parsed::Valid(_))
    }
}

impl ThemeDocument {
    /// Checks that every icon key referenced by a role, a binding map, or a
    /// variant role has an entry in `iconDefinitions`.
    ///
    /// Returns every dangling reference rather than the first, so recovery
    /// logs show the full damage in one pass.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        let mut check = |referrer: String, icon_key: &str| {
            if !self.icon_definitions.contains_key(icon_key) {
                dangling.push(DanglingReference {
                    referrer,
                    icon_key: icon_key.to_string(),
                });
            }
        };

        check("fileRole".to_string(), &self.file_role);
        check("folderRole".to_string(), &self.folder_role);
        check("folderExpandedRole".to_string(), &self.folder_expanded_role);

        for (ext, key) in &self.extension_bindings {
            check(format!("extensionBindings.{ext}"), key);
        }
        for (name, key) in &self.filename_bindings {
            check(format!("filenameBindings.{name}"), key);
        }
        for (lang, key) in &self.language_bindings {
            check(format!("languageBindings.{lang}"), key);
        }

        for (variant, roles) in [("light", &self.light), ("highContrast", &self.high_contrast)] {
            if let Some(roles) = roles {
                if let Some(key) = &roles.file_role {
                    check(format!("{variant}.fileRole"), key);
                }
                if let Some(key) = &roles.folder_role {
                    check(format!("{variant}.folderRole"), key);
                }
                if let Some(key) = &roles.folder_expanded_role {
                    check(format!("{variant}.folderExpandedRole"), key);
                }
            }
        }

        dangling
    }

    /// Structural validity: decodable fields plus no dangling references.
    pub fn validate(&self) -> Result<(), InvalidReason> {
        let dangling = self.dangling_references();
        if dangling.is_empty() {
            Ok(())
        } else {
            Err(InvalidReason::DanglingReferences(dangling))
        }
    }
}

/// Decodes document text into the [`Parsed`] sum type.
///
/// Decoding failures of any kind (not JSON, not an object, missing required
/// fields) become [`InvalidReason::Malformed`]; a decodable document with
/// unresolved icon references becomes [`InvalidReason::DanglingReferences`].
pub fn parse_document(text: &str) -> Parsed {
    let doc: ThemeDocument = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(e) => return Parsed::Invalid(InvalidReason::Malformed(e.to_string())),
    };
    match doc.validate() {
        Ok(()) => Parsed::Valid(doc),
        Err(reason) => Parsed::Invalid(reason),
    }
}

/// Serializes a document as pretty JSON (2-space indentation, trailing
/// newline) for diffable committed artifacts.
pub fn serialize_document(doc: &ThemeDocument) -> Result<String, serde_json::Error> {
    let mut output = serde_json::to_string_pretty(doc)?;
    output.push('\n');
    Ok(output)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(path: &str, color: Option<&str>) -> IconDefinition {
        IconDefinition {
            asset_path: path.to_string(),
            style_color: color.map(str::to_string),
            glyph: None,
        }
    }

    fn minimal_valid_document() -> ThemeDocument {
        let mut icon_definitions = BTreeMap::new();
        icon_definitions.insert("_file".to_string(), definition("./icons/file.svg", None));
        icon_definitions.insert("_folder".to_string(), definition("./icons/folder.svg", None));
        icon_definitions.insert(
            "_folder_open".to_string(),
            definition("./icons/folder-open.svg", None),
        );
        ThemeDocument {
            icon_definitions,
            file_role: "_file".to_string(),
            folder_role: "_folder".to_string(),
            folder_expanded_role: "_folder_open".to_string(),
            extension_bindings: BTreeMap::new(),
            filename_bindings: BTreeMap::new(),
            language_bindings: BTreeMap::new(),
            light: None,
            high_contrast: None,
        }
    }

    // ── parse_document ────────────────────────────────────────────────────────

    #[test]
    fn test_parse_document_accepts_minimal_valid_document() {
        let text = serialize_document(&minimal_valid_document()).unwrap();
        assert!(parse_document(&text).is_valid());
    }

    #[test]
    fn test_parse_document_rejects_non_json_text() {
        let parsed = parse_document("this is not json");
        assert!(matches!(
            parsed,
            Parsed::Invalid(InvalidReason::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_document_rejects_non_object_json() {
        let parsed = parse_document("[1, 2, 3]");
        assert!(matches!(
            parsed,
            Parsed::Invalid(InvalidReason::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_document_rejects_document_without_roles() {
        // Missing fileRole/folderRole is a decode failure, not a half-typed
        // object to inspect afterwards.
        let parsed = parse_document(r#"{"iconDefinitions": {}}"#);
        assert!(matches!(
            parsed,
            Parsed::Invalid(InvalidReason::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_document_rejects_dangling_role_reference() {
        let mut doc = minimal_valid_document();
        doc.file_role = "missing".to_string();
        let text = serialize_document(&doc).unwrap();
        match parse_document(&text) {
            Parsed::Invalid(InvalidReason::DanglingReferences(refs)) => {
                assert_eq!(refs.len(), 1);
                assert_eq!(refs[0].referrer, "fileRole");
                assert_eq!(refs[0].icon_key, "missing");
            }
            other => panic!("expected dangling references, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_document_tolerates_unknown_fields() {
        let text = r#"{
          "iconDefinitions": {"_file": {"assetPath": ""}},
          "fileRole": "_file",
          "folderRole": "_file",
          "folderExpandedRole": "_file",
          "hidesExplorerArrows": true
        }"#;
        assert!(parse_document(text).is_valid());
    }

    // ── dangling_references ───────────────────────────────────────────────────

    #[test]
    fn test_dangling_references_reports_binding_values() {
        let mut doc = minimal_valid_document();
        doc.extension_bindings
            .insert("rs".to_string(), "rust".to_string());
        doc.filename_bindings
            .insert("Makefile".to_string(), "make".to_string());
        doc.language_bindings
            .insert("python".to_string(), "py".to_string());

        let refs = doc.dangling_references();
        let referrers: Vec<&str> = refs.iter().map(|r| r.referrer.as_str()).collect();
        assert_eq!(
            referrers,
            vec![
                "extensionBindings.rs",
                "filenameBindings.Makefile",
                "languageBindings.python"
            ]
        );
    }

    #[test]
    fn test_dangling_references_reports_variant_roles() {
        let mut doc = minimal_valid_document();
        doc.light = Some(VariantRoles {
            file_role: Some("_file_light".to_string()),
            folder_role: None,
            folder_expanded_role: None,
        });
        let refs = doc.dangling_references();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].referrer, "light.fileRole");
    }

    #[test]
    fn test_validate_passes_when_all_references_resolve() {
        let mut doc = minimal_valid_document();
        doc.icon_definitions
            .insert("js".to_string(), definition("./icons/js.svg", Some("#cbcb41")));
        doc.extension_bindings
            .insert("js".to_string(), "js".to_string());
        assert_eq!(doc.validate(), Ok(()));
    }

    // ── serialization ─────────────────────────────────────────────────────────

    #[test]
    fn test_serialize_document_round_trips() {
        let mut doc = minimal_valid_document();
        doc.icon_definitions
            .insert("js".to_string(), definition("./icons/js.svg", Some("#cbcb41")));
        doc.extension_bindings
            .insert("js".to_string(), "js".to_string());
        doc.light = Some(VariantRoles {
            file_role: Some("_file".to_string()),
            folder_role: Some("_folder".to_string()),
            folder_expanded_role: Some("_folder_open".to_string()),
        });

        let text = serialize_document(&doc).unwrap();
        assert_eq!(parse_document(&text), Parsed::Valid(doc));
    }

    #[test]
    fn test_serialize_document_uses_two_space_indent_and_trailing_newline() {
        let text = serialize_document(&minimal_valid_document()).unwrap();
        assert!(text.starts_with("{\n  \"iconDefinitions\""));
        assert!(text.ends_with("\n"));
    }

    #[test]
    fn test_serialize_document_writes_empty_asset_path() {
        let mut doc = minimal_valid_document();
        doc.icon_definitions
            .insert("_file".to_string(), definition("", None));
        let text = serialize_document(&doc).unwrap();
        assert!(text.contains(r#""assetPath": """#));
    }

    #[test]
    fn test_overlay_document_decodes_from_partial_json() {
        let overlay: OverlayDocument = serde_json::from_str(
            r#"{"iconDefinitions": {"js": {"assetPath": "./icons/frameworks/next-js.svg"}}}"#,
        )
        .unwrap();
        assert_eq!(overlay.icon_definitions.len(), 1);
        assert!(overlay.extension_bindings.is_empty());
    }
}
