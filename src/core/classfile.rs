//! Bytecode engine boundary.
//!
//! The renaming core never touches raw bytecode. A [`ClassCodec`] decodes a
//! compiled-code entry into a [`ClassModel`] and re-encodes a transformed
//! model back into bytes; everything in between operates on the structured
//! model. The bundled [`JsonClassCodec`] serializes the model as JSON and is
//! what the CLI and the test suite run against; a real binary codec plugs in
//! behind the same trait.
//!
//! Names inside a model use the archive-internal slash-delimited form
//! (`com/foo/Bar`); resolvers use the dotted form (`com.foo.Bar`).

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One decoded compiled-code unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassModel {
    /// The class's own internal name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
}

/// A declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub descriptor: String,
}

/// A declared method with the symbol and literal operands of its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub descriptor: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<BodyRef>,
}

/// A reference reachable from a method body that the remapper must rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ref", rename_all = "snake_case")]
pub enum BodyRef {
    /// A type reference (new, checkcast, catch type, ...).
    Type { name: String },
    /// A field access.
    Field {
        owner: String,
        name: String,
        descriptor: String,
    },
    /// A method invocation.
    Method {
        owner: String,
        name: String,
        descriptor: String,
    },
    /// A loaded string literal.
    Str { value: String },
}

impl ClassModel {
    /// Every string literal loaded anywhere in this class's method bodies.
    pub fn string_literals(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().flat_map(|m| {
            m.body.iter().filter_map(|r| match r {
                BodyRef::Str { value } => Some(value.as_str()),
                _ => None,
            })
        })
    }
}

/// Decode/encode contract between the pipeline and a bytecode engine.
pub trait ClassCodec {
    fn decode(&self, bytes: &[u8]) -> Result<ClassModel>;
    fn encode(&self, model: &ClassModel) -> Result<Vec<u8>>;
}

/// The bundled reference codec: the model serialized as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonClassCodec;

impl ClassCodec for JsonClassCodec {
    fn decode(&self, bytes: &[u8]) -> Result<ClassModel> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn encode(&self, model: &ClassModel) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(model)?)
    }
}

/// Path suffix marking an archive entry as a compiled-code unit.
pub const CLASS_SUFFIX: &str = ".class";

/// Convert an internal (slash) name to a dotted qualified name.
pub fn to_dotted(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Convert a dotted qualified name to its internal (slash) form.
pub fn to_internal(dotted: &str) -> String {
    dotted.replace('.', "/")
}

/// The archive entry path for a class given its dotted qualified name.
pub fn class_entry_path(dotted: &str) -> String {
    format!("{}{}", to_internal(dotted), CLASS_SUFFIX)
}

/// The dotted class name for an archive entry path, if it is a class entry.
pub fn entry_class_name(path: &str) -> Option<String> {
    path.strip_suffix(CLASS_SUFFIX).map(to_dotted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_paths_round_trip_class_names() {
        assert_eq!(entry_class_name("com/foo/Bar.class").as_deref(), Some("com.foo.Bar"));
        assert_eq!(entry_class_name("META-INF/MANIFEST.MF"), None);
        assert_eq!(class_entry_path("com.foo.Bar"), "com/foo/Bar.class");
    }

    #[test]
    fn json_codec_decodes_what_it_encodes() {
        let model = ClassModel {
            name: "com/foo/Bar".to_string(),
            super_name: Some("java/lang/Object".to_string()),
            interfaces: vec!["com/foo/Iface".to_string()],
            fields: vec![FieldDecl {
                name: "a".to_string(),
                descriptor: "I".to_string(),
            }],
            methods: vec![MethodDecl {
                name: "b".to_string(),
                descriptor: "()V".to_string(),
                body: vec![BodyRef::Str {
                    value: "com.foo.Bar".to_string(),
                }],
            }],
        };

        let codec = JsonClassCodec;
        let decoded = codec.decode(&codec.encode(&model).unwrap()).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn json_codec_rejects_garbage() {
        assert!(JsonClassCodec.decode(b"\xca\xfe\xba\xbe").is_err());
    }

    #[test]
    fn string_literals_come_from_all_method_bodies() {
        let model = ClassModel {
            name: "a/B".to_string(),
            super_name: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: vec![
                MethodDecl {
                    name: "m".to_string(),
                    descriptor: "()V".to_string(),
                    body: vec![
                        BodyRef::Str { value: "one".to_string() },
                        BodyRef::Type { name: "a/C".to_string() },
                    ],
                },
                MethodDecl {
                    name: "n".to_string(),
                    descriptor: "()V".to_string(),
                    body: vec![BodyRef::Str { value: "two".to_string() }],
                },
            ],
        };

        let literals: Vec<&str> = model.string_literals().collect();
        assert_eq!(literals, vec!["one", "two"]);
    }
}
