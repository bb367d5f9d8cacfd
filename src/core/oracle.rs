//! The remapping oracle consulted by the bytecode engine while re-encoding.
//!
//! A [`Remapper`] borrows the one [`RenameContext`] built during analysis.
//! Its caches are the global structures themselves, not copies, so the
//! transform pass cannot diverge from what analysis recorded.

use crate::classfile::{to_dotted, to_internal, BodyRef, ClassModel, FieldDecl, MethodDecl};
use crate::context::RenameContext;
use crate::record::RecordKind;

pub struct Remapper<'ctx> {
    ctx: &'ctx mut RenameContext,
}

impl<'ctx> Remapper<'ctx> {
    pub fn new(ctx: &'ctx mut RenameContext) -> Self {
        Remapper { ctx }
    }

    /// Map an internal class name to its resolved internal name.
    pub fn map_class(&mut self, internal: &str) -> String {
        to_internal(&self.ctx.resolve_class(&to_dotted(internal)))
    }

    /// Map a method name given its owning class (internal form).
    pub fn map_method(&mut self, owner: &str, name: &str, descriptor: &str) -> String {
        self.ctx
            .resolve_member(RecordKind::Method, &to_dotted(owner), name, descriptor)
    }

    /// Map a field name given its owning class (internal form).
    pub fn map_field(&mut self, owner: &str, name: &str, descriptor: &str) -> String {
        self.ctx
            .resolve_member(RecordKind::Field, &to_dotted(owner), name, descriptor)
    }

    /// Map a string literal; unmatched literals come back unchanged.
    pub fn map_literal(&self, value: &str) -> String {
        self.ctx
            .lookup_string(value)
            .unwrap_or(value)
            .to_string()
    }

    /// Rewrite every object type embedded in a field or method descriptor.
    ///
    /// `(Lcom/foo/Bar;I)Lcom/foo/Baz;` has both of its class references
    /// resolved; primitives and array dimensions pass through.
    pub fn map_descriptor(&mut self, descriptor: &str) -> String {
        let mut out = String::with_capacity(descriptor.len());
        let mut chars = descriptor.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                'L' => {
                    let rest = &descriptor[pos + 1..];
                    match rest.find(';') {
                        Some(end) => {
                            out.push('L');
                            out.push_str(&self.map_class(&rest[..end]));
                            out.push(';');
                            // Skip past the consumed internal name and ';'.
                            while let Some(&(p, _)) = chars.peek() {
                                if p > pos + end + 1 {
                                    break;
                                }
                                chars.next();
                            }
                        }
                        None => out.push(c),
                    }
                }
                _ => out.push(c),
            }
        }

        out
    }
}

/// Re-encode a decoded class through the oracle: self type, supertypes,
/// declarations, descriptors, body references and string literals.
pub fn remap_class(model: &ClassModel, rm: &mut Remapper<'_>) -> ClassModel {
    let owner = model.name.as_str();

    ClassModel {
        name: rm.map_class(owner),
        super_name: model.super_name.as_deref().map(|s| rm.map_class(s)),
        interfaces: model.interfaces.iter().map(|i| rm.map_class(i)).collect(),
        fields: model
            .fields
            .iter()
            .map(|f| FieldDecl {
                name: rm.map_field(owner, &f.name, &f.descriptor),
                descriptor: rm.map_descriptor(&f.descriptor),
            })
            .collect(),
        methods: model
            .methods
            .iter()
            .map(|m| MethodDecl {
                name: rm.map_method(owner, &m.name, &m.descriptor),
                descriptor: rm.map_descriptor(&m.descriptor),
                body: m.body.iter().map(|r| remap_body_ref(r, rm)).collect(),
            })
            .collect(),
    }
}

fn remap_body_ref(body_ref: &BodyRef, rm: &mut Remapper<'_>) -> BodyRef {
    match body_ref {
        BodyRef::Type { name } => BodyRef::Type {
            name: rm.map_class(name),
        },
        BodyRef::Field {
            owner,
            name,
            descriptor,
        } => BodyRef::Field {
            owner: rm.map_class(owner),
            name: rm.map_field(owner, name, descriptor),
            descriptor: rm.map_descriptor(descriptor),
        },
        BodyRef::Method {
            owner,
            name,
            descriptor,
        } => BodyRef::Method {
            owner: rm.map_class(owner),
            name: rm.map_method(owner, name, descriptor),
            descriptor: rm.map_descriptor(descriptor),
        },
        BodyRef::Str { value } => BodyRef::Str {
            value: rm.map_literal(value),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MatchMode;
    use crate::record::{RecordSet, RenameRecord};
    use std::collections::HashSet;

    fn bar_to_ab_context() -> RenameContext {
        RenameContext::new(
            RecordSet::new(vec![
                RenameRecord {
                    kind: RecordKind::Class,
                    owner: "com.foo".to_string(),
                    original_name: "Bar".to_string(),
                    descriptor: "com.foo.Bar".to_string(),
                    new_name: "a.b".to_string(),
                },
                RenameRecord {
                    kind: RecordKind::Field,
                    owner: "com.foo.Bar".to_string(),
                    original_name: "count".to_string(),
                    descriptor: "I".to_string(),
                    new_name: "c".to_string(),
                },
                RenameRecord {
                    kind: RecordKind::Method,
                    owner: "com.foo.Bar".to_string(),
                    original_name: "helper".to_string(),
                    descriptor: "()V".to_string(),
                    new_name: "h".to_string(),
                },
            ]),
            HashSet::new(),
            MatchMode::Strict,
        )
    }

    #[test]
    fn descriptor_object_types_are_rewritten() {
        let mut ctx = bar_to_ab_context();
        let mut rm = Remapper::new(&mut ctx);

        assert_eq!(
            rm.map_descriptor("(Lcom/foo/Bar;I)Lcom/foo/Bar;"),
            "(La/b;I)La/b;"
        );
    }

    #[test]
    fn descriptor_arrays_and_primitives_pass_through() {
        let mut ctx = bar_to_ab_context();
        let mut rm = Remapper::new(&mut ctx);

        assert_eq!(rm.map_descriptor("[[Lcom/foo/Bar;"), "[[La/b;");
        assert_eq!(rm.map_descriptor("(IJZ)V"), "(IJZ)V");
        assert_eq!(rm.map_descriptor("[I"), "[I");
    }

    #[test]
    fn platform_types_in_descriptors_are_untouched() {
        let mut ctx = bar_to_ab_context();
        let mut rm = Remapper::new(&mut ctx);

        assert_eq!(
            rm.map_descriptor("(Ljava/lang/String;)V"),
            "(Ljava/lang/String;)V"
        );
    }

    #[test]
    fn remap_class_rewrites_self_type_and_members() {
        let mut ctx = bar_to_ab_context();
        let model = ClassModel {
            name: "com/foo/Bar".to_string(),
            super_name: Some("java/lang/Object".to_string()),
            interfaces: vec!["com/foo/Bar".to_string()],
            fields: vec![FieldDecl {
                name: "count".to_string(),
                descriptor: "I".to_string(),
            }],
            methods: vec![MethodDecl {
                name: "helper".to_string(),
                descriptor: "()V".to_string(),
                body: vec![
                    BodyRef::Type {
                        name: "com/foo/Bar".to_string(),
                    },
                    BodyRef::Method {
                        owner: "com/foo/Bar".to_string(),
                        name: "helper".to_string(),
                        descriptor: "()V".to_string(),
                    },
                ],
            }],
        };

        let mut rm = Remapper::new(&mut ctx);
        let remapped = remap_class(&model, &mut rm);

        assert_eq!(remapped.name, "a/b");
        assert_eq!(remapped.super_name.as_deref(), Some("java/lang/Object"));
        assert_eq!(remapped.interfaces, vec!["a/b".to_string()]);
        assert_eq!(remapped.fields[0].name, "c");
        assert_eq!(remapped.methods[0].name, "h");
        assert_eq!(
            remapped.methods[0].body,
            vec![
                BodyRef::Type {
                    name: "a/b".to_string()
                },
                BodyRef::Method {
                    owner: "a/b".to_string(),
                    name: "h".to_string(),
                    descriptor: "()V".to_string(),
                },
            ]
        );
    }

    #[test]
    fn declaration_and_reference_agree_on_the_final_name() {
        // A call site resolved during transform must see the same name the
        // declaration received during analysis.
        let mut ctx = bar_to_ab_context();
        let declared = ctx.resolve_member(RecordKind::Method, "com.foo.Bar", "helper", "()V");

        let mut rm = Remapper::new(&mut ctx);
        assert_eq!(rm.map_method("com/foo/Bar", "helper", "()V"), declared);
    }

    #[test]
    fn constructors_are_never_remapped() {
        let mut ctx = bar_to_ab_context();
        let mut rm = Remapper::new(&mut ctx);

        assert_eq!(rm.map_method("com/foo/Bar", "<init>", "()V"), "<init>");
    }
}
