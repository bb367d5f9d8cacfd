//! Mapping loader: parses a hierarchical rename-table export into records.
//!
//! The export is a nested JSON document in which any object may carry the
//! leaf dictionaries `renamed_classes`, `renamed_fields` and
//! `renamed_methods`, each mapping a compiled-code signature string to a
//! target identifier:
//!
//! ```text
//! class:  "Lcom/foo/Bar;"                -> "Widget"
//! field:  "Lcom/foo/Bar;->a:I"           -> "count"
//! method: "Lcom/foo/Bar;->b(I)V"         -> "update"
//! ```

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::record::{RecordKind, RenameRecord};

/// Load and parse a mapping file into plain rename records.
pub fn load_records(path: &Path) -> Result<Vec<RenameRecord>> {
    let text = fs::read_to_string(path).map_err(|e| Error::MappingRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let root: Value = serde_json::from_str(&text).map_err(|e| Error::MappingRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut records = Vec::new();
    collect(&root, &mut records)?;
    Ok(records)
}

fn collect(value: &Value, records: &mut Vec<RenameRecord>) -> Result<()> {
    let Value::Object(map) = value else {
        return Ok(());
    };

    for (key, child) in map {
        match key.as_str() {
            "renamed_classes" => collect_kind(key, child, RecordKind::Class, records)?,
            "renamed_methods" => collect_kind(key, child, RecordKind::Method, records)?,
            "renamed_fields" => collect_kind(key, child, RecordKind::Field, records)?,
            _ => collect(child, records)?,
        }
    }

    Ok(())
}

fn collect_kind(
    section: &str,
    value: &Value,
    kind: RecordKind,
    records: &mut Vec<RenameRecord>,
) -> Result<()> {
    let Value::Object(entries) = value else {
        return Err(Error::MappingFormat {
            key: section.to_string(),
            reason: "expected an object of signature -> identifier".to_string(),
        });
    };

    for (signature, target) in entries {
        let new_name = target.as_str().ok_or_else(|| Error::MappingFormat {
            key: signature.clone(),
            reason: "replacement name must be a string".to_string(),
        })?;
        records.push(parse_record(kind, signature, new_name)?);
    }

    Ok(())
}

fn parse_record(kind: RecordKind, signature: &str, new_name: &str) -> Result<RenameRecord> {
    match kind {
        RecordKind::Class => {
            let dotted = normalize_type(signature, signature)?;
            let (owner, simple) = match dotted.rsplit_once('.') {
                Some((package, simple)) => (package.to_string(), simple.to_string()),
                None => (String::new(), dotted.clone()),
            };
            Ok(RenameRecord {
                kind,
                owner,
                original_name: simple,
                descriptor: dotted,
                new_name: new_name.to_string(),
            })
        }
        RecordKind::Method | RecordKind::Field => {
            let (class_sig, member) = signature.split_once("->").ok_or_else(|| {
                Error::MappingFormat {
                    key: signature.to_string(),
                    reason: "missing '->' between class and member".to_string(),
                }
            })?;
            let owner = normalize_type(class_sig, signature)?;

            let (name, descriptor) = if kind == RecordKind::Field {
                member.split_once(':').ok_or_else(|| Error::MappingFormat {
                    key: signature.to_string(),
                    reason: "missing ':' before field descriptor".to_string(),
                })?
            } else {
                let args = member.find('(').ok_or_else(|| Error::MappingFormat {
                    key: signature.to_string(),
                    reason: "missing '(' before method descriptor".to_string(),
                })?;
                (&member[..args], &member[args..])
            };

            if name.is_empty() {
                return Err(Error::MappingFormat {
                    key: signature.to_string(),
                    reason: "empty member name".to_string(),
                });
            }

            Ok(RenameRecord {
                kind,
                owner,
                original_name: name.to_string(),
                descriptor: descriptor.to_string(),
                new_name: new_name.to_string(),
            })
        }
    }
}

/// Normalize an object-type signature (`Lpkg/Name;`) to a dotted name.
///
/// Only the leading `L` and trailing `;` are stripped; any `L` inside the
/// name itself is part of the name.
fn normalize_type(sig: &str, key: &str) -> Result<String> {
    let inner = sig
        .strip_prefix('L')
        .and_then(|s| s.strip_suffix(';'))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::MappingFormat {
            key: key.to_string(),
            reason: format!("'{}' is not an object type of the form 'Lpkg/Name;'", sig),
        })?;
    Ok(inner.replace('/', "."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(json: &str) -> Result<Vec<RenameRecord>> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load_records(file.path())
    }

    #[test]
    fn parses_all_three_record_kinds() {
        let records = load(
            r#"{
                "unit": {
                    "com/foo": {
                        "renamed_classes": { "Lcom/foo/Bar;": "Widget" },
                        "renamed_fields": { "Lcom/foo/Bar;->a:I": "count" },
                        "renamed_methods": { "Lcom/foo/Bar;->b(I)V": "update" }
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(records.len(), 3);

        let class = records.iter().find(|r| r.kind == RecordKind::Class).unwrap();
        assert_eq!(class.owner, "com.foo");
        assert_eq!(class.original_name, "Bar");
        assert_eq!(class.descriptor, "com.foo.Bar");
        assert_eq!(class.new_name, "Widget");

        let field = records.iter().find(|r| r.kind == RecordKind::Field).unwrap();
        assert_eq!(field.owner, "com.foo.Bar");
        assert_eq!(field.original_name, "a");
        assert_eq!(field.descriptor, "I");

        let method = records.iter().find(|r| r.kind == RecordKind::Method).unwrap();
        assert_eq!(method.owner, "com.foo.Bar");
        assert_eq!(method.original_name, "b");
        assert_eq!(method.descriptor, "(I)V");
    }

    #[test]
    fn names_containing_l_survive_normalization() {
        let records = load(
            r#"{ "x": { "renamed_classes": { "Lcom/app/LoginHelper;": "Auth" } } }"#,
        )
        .unwrap();
        assert_eq!(records[0].descriptor, "com.app.LoginHelper");
    }

    #[test]
    fn leaf_dictionaries_found_at_any_depth() {
        let records = load(
            r#"{ "a": { "b": { "c": { "renamed_methods": { "La/B;->m()V": "run" } } } } }"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owner, "a.B");
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let records = load(r#"{ "version": "1.2", "notes": ["x"], "count": 3 }"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_arrow_is_a_format_error() {
        let err = load(r#"{ "x": { "renamed_fields": { "Lcom/foo/Bar;a:I": "n" } } }"#)
            .unwrap_err();
        match err {
            Error::MappingFormat { key, reason } => {
                assert_eq!(key, "Lcom/foo/Bar;a:I");
                assert!(reason.contains("->"));
            }
            other => panic!("expected MappingFormat, got {:?}", other),
        }
    }

    #[test]
    fn missing_field_descriptor_is_a_format_error() {
        let err = load(r#"{ "x": { "renamed_fields": { "Lcom/foo/Bar;->a": "n" } } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::MappingFormat { .. }));
    }

    #[test]
    fn missing_method_parens_is_a_format_error() {
        let err = load(r#"{ "x": { "renamed_methods": { "Lcom/foo/Bar;->m": "n" } } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::MappingFormat { .. }));
    }

    #[test]
    fn malformed_class_signature_is_a_format_error() {
        let err = load(r#"{ "x": { "renamed_classes": { "com/foo/Bar": "n" } } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::MappingFormat { .. }));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let err = load_records(Path::new("/nonexistent/mapping.json")).unwrap_err();
        assert_eq!(err.code(), "MAPPING_READ_ERROR");
    }
}
