//! Rename records: the immutable rename requests driving a run.

use serde::Serialize;

use crate::context::MatchMode;

/// Which kind of symbol a record renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Class,
    Method,
    Field,
}

/// A single rename request.
///
/// For class records `owner` is the package, `original_name` the simple
/// class name and `descriptor` the full dotted name. For member records
/// `owner` is the owning class's dotted name and `descriptor` the member's
/// type signature exactly as it appeared in the mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub kind: RecordKind,
    pub owner: String,
    pub original_name: String,
    pub descriptor: String,
    pub new_name: String,
}

impl RenameRecord {
    /// The fully qualified dotted name a class record renames to.
    ///
    /// A `new_name` that already carries a package (contains a dot) is taken
    /// as the complete new name; a plain identifier stays in the record's
    /// owning package.
    pub fn qualified_new_name(&self) -> String {
        if self.new_name.contains('.') || self.owner.is_empty() {
            self.new_name.clone()
        } else {
            format!("{}.{}", self.owner, self.new_name)
        }
    }
}

/// All rename records of a run, grouped by kind. Built once by the mapping
/// loader and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    classes: Vec<RenameRecord>,
    methods: Vec<RenameRecord>,
    fields: Vec<RenameRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<RenameRecord>) -> Self {
        let mut set = RecordSet::default();
        for record in records {
            match record.kind {
                RecordKind::Class => set.classes.push(record),
                RecordKind::Method => set.methods.push(record),
                RecordKind::Field => set.fields.push(record),
            }
        }
        set
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether the string analysis pass has anything to look for.
    pub fn has_class_or_method_records(&self) -> bool {
        !self.classes.is_empty() || !self.methods.is_empty()
    }

    /// Find the class record whose descriptor (full dotted name) equals `name`.
    pub fn find_class(&self, name: &str) -> Option<&RenameRecord> {
        self.classes.iter().find(|r| r.descriptor == name)
    }

    /// Find a member record for `(owner, name, descriptor)`.
    ///
    /// Strict mode requires all three to match; the name-only compatibility
    /// mode matches any record of the right kind with the same original name.
    pub fn find_member(
        &self,
        kind: RecordKind,
        owner: &str,
        name: &str,
        descriptor: &str,
        mode: MatchMode,
    ) -> Option<&RenameRecord> {
        let records = match kind {
            RecordKind::Method => &self.methods,
            RecordKind::Field => &self.fields,
            RecordKind::Class => return None,
        };
        records.iter().find(|r| match mode {
            MatchMode::Strict => {
                r.owner == owner && r.original_name == name && r.descriptor == descriptor
            }
            MatchMode::NameOnly => r.original_name == name,
        })
    }

    /// Find a method record by plain original name, regardless of owner.
    /// Used by the string co-renamer's textual heuristic.
    pub fn find_method_named(&self, name: &str) -> Option<&RenameRecord> {
        self.methods.iter().find(|r| r.original_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_record(owner: &str, original: &str, desc: &str, new_name: &str) -> RenameRecord {
        RenameRecord {
            kind: RecordKind::Class,
            owner: owner.to_string(),
            original_name: original.to_string(),
            descriptor: desc.to_string(),
            new_name: new_name.to_string(),
        }
    }

    fn method_record(owner: &str, name: &str, desc: &str, new_name: &str) -> RenameRecord {
        RenameRecord {
            kind: RecordKind::Method,
            owner: owner.to_string(),
            original_name: name.to_string(),
            descriptor: desc.to_string(),
            new_name: new_name.to_string(),
        }
    }

    #[test]
    fn qualified_new_name_joins_owner_package() {
        let record = class_record("com.foo", "Bar", "com.foo.Bar", "Widget");
        assert_eq!(record.qualified_new_name(), "com.foo.Widget");
    }

    #[test]
    fn qualified_new_name_keeps_packaged_target() {
        let record = class_record("com.foo", "Bar", "com.foo.Bar", "a.b");
        assert_eq!(record.qualified_new_name(), "a.b");
    }

    #[test]
    fn qualified_new_name_default_package() {
        let record = class_record("", "Bar", "Bar", "Widget");
        assert_eq!(record.qualified_new_name(), "Widget");
    }

    #[test]
    fn find_member_strict_requires_owner_and_descriptor() {
        let set = RecordSet::new(vec![method_record("com.foo.Bar", "x", "()V", "q")]);

        assert!(set
            .find_member(RecordKind::Method, "com.foo.Bar", "x", "()V", MatchMode::Strict)
            .is_some());
        assert!(set
            .find_member(RecordKind::Method, "com.foo.Baz", "x", "()V", MatchMode::Strict)
            .is_none());
        assert!(set
            .find_member(RecordKind::Method, "com.foo.Bar", "x", "(I)V", MatchMode::Strict)
            .is_none());
    }

    #[test]
    fn find_member_name_only_ignores_owner_and_descriptor() {
        let set = RecordSet::new(vec![method_record("com.foo.Bar", "x", "()V", "q")]);

        let hit = set.find_member(
            RecordKind::Method,
            "com.foo.Baz",
            "x",
            "(I)V",
            MatchMode::NameOnly,
        );
        assert_eq!(hit.map(|r| r.new_name.as_str()), Some("q"));
    }

    #[test]
    fn member_lookup_never_returns_class_records() {
        let set = RecordSet::new(vec![class_record("com.foo", "Bar", "com.foo.Bar", "a.b")]);
        assert!(set
            .find_member(RecordKind::Class, "com.foo", "Bar", "", MatchMode::NameOnly)
            .is_none());
    }
}
