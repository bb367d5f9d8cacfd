//! The run-wide rename context: one explicit value owning every shared map.
//!
//! All three pipeline passes and the remapping oracle consult the same
//! context instance. The consistency cache guarantees that once a symbol key
//! resolves to a name, every later lookup in any pass returns the
//! identical value.

use std::collections::{HashMap, HashSet};

use crate::collision;
use crate::namespace;
use crate::record::{RecordKind, RecordSet};

/// How member rename records are matched against observed members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Match by owner, name and descriptor. The default: overloaded members
    /// sharing a name but differing in signature stay distinguishable.
    #[default]
    Strict,
    /// Legacy descriptor-less matching: any record of the right kind with
    /// the same original name applies, regardless of owner or signature.
    NameOnly,
}

/// Identity of a renameable entity in the consistency cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SymbolKey {
    Class {
        name: String,
    },
    Member {
        kind: RecordKind,
        owner: String,
        name: String,
        /// `Some` in strict mode, `None` in name-only mode. Overloads share
        /// one key exactly when they share one rename.
        descriptor: Option<String>,
    },
}

/// Summary counters for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub renamed_classes: usize,
    pub renamed_members: usize,
    pub string_substitutions: usize,
}

pub struct RenameContext {
    records: RecordSet,
    exclusions: HashSet<String>,
    mode: MatchMode,
    cache: HashMap<SymbolKey, String>,
    used_names: HashMap<String, HashSet<String>>,
    suffix_counters: HashMap<(String, String), u32>,
    string_map: HashMap<String, String>,
}

impl RenameContext {
    pub fn new(records: RecordSet, exclusions: HashSet<String>, mode: MatchMode) -> Self {
        RenameContext {
            records,
            exclusions,
            mode,
            cache: HashMap::new(),
            used_names: HashMap::new(),
            suffix_counters: HashMap::new(),
            string_map: HashMap::new(),
        }
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn is_excluded(&self, class_name: &str) -> bool {
        self.exclusions.contains(class_name)
    }

    /// Whether the string analysis pass has anything to do.
    pub fn wants_string_analysis(&self) -> bool {
        self.records.has_class_or_method_records()
    }

    /// Resolve a class's new fully qualified dotted name.
    ///
    /// Exclusions and the protected-namespace guard win over any record,
    /// including one that coincidentally targets a guarded name.
    pub fn resolve_class(&mut self, name: &str) -> String {
        let key = SymbolKey::Class {
            name: name.to_string(),
        };
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let resolved = if self.is_excluded(name) || namespace::is_protected(name) {
            name.to_string()
        } else {
            self.records
                .find_class(name)
                .map(|r| r.qualified_new_name())
                .unwrap_or_else(|| name.to_string())
        };

        self.cache.insert(key, resolved.clone());
        resolved
    }

    /// Resolve a member's new name within its owning class.
    ///
    /// An identity rename is invisible to collision bookkeeping: no name is
    /// claimed and no suffix counter advances. A real rename goes through
    /// the collision resolver and the final name is claimed in the owner's
    /// used-name set before being cached.
    pub fn resolve_member(
        &mut self,
        kind: RecordKind,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> String {
        // Constructor-like names are structural, not renameable identifiers.
        if name.starts_with('<') {
            return name.to_string();
        }

        let key = self.member_key(kind, owner, name, descriptor);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        if self.is_excluded(owner) || namespace::is_protected(owner) {
            self.cache.insert(key, name.to_string());
            return name.to_string();
        }

        let candidate = self
            .records
            .find_member(kind, owner, name, descriptor, self.mode)
            .map(|r| r.new_name.clone())
            .unwrap_or_else(|| name.to_string());

        if candidate == name {
            self.cache.insert(key, candidate.clone());
            return candidate;
        }

        let used = self.used_names.entry(owner.to_string()).or_default();
        let resolved = collision::reserve(used, &mut self.suffix_counters, owner, &candidate);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    /// Claim a class's original member names before resolving any of them,
    /// so a rename can never land on a name an untouched sibling still holds.
    pub fn seed_used_names<I, S>(&mut self, owner: &str, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.used_names
            .entry(owner.to_string())
            .or_default()
            .extend(names.into_iter().map(Into::into));
    }

    pub fn lookup_string(&self, literal: &str) -> Option<&str> {
        self.string_map.get(literal).map(String::as_str)
    }

    pub fn has_string(&self, literal: &str) -> bool {
        self.string_map.contains_key(literal)
    }

    pub fn record_string(&mut self, literal: &str, replacement: String) {
        self.string_map.insert(literal.to_string(), replacement);
    }

    pub fn stats(&self) -> ResolutionStats {
        let mut stats = ResolutionStats {
            string_substitutions: self.string_map.len(),
            ..Default::default()
        };
        for (key, resolved) in &self.cache {
            match key {
                SymbolKey::Class { name } if name != resolved => stats.renamed_classes += 1,
                SymbolKey::Member { name, .. } if name != resolved => stats.renamed_members += 1,
                _ => {}
            }
        }
        stats
    }

    fn member_key(&self, kind: RecordKind, owner: &str, name: &str, descriptor: &str) -> SymbolKey {
        SymbolKey::Member {
            kind,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: match self.mode {
                MatchMode::Strict => Some(descriptor.to_string()),
                MatchMode::NameOnly => None,
            },
        }
    }
}
