//! Per-class collision avoidance for member renames.

use std::collections::{HashMap, HashSet};

/// Reserve a collision-free name for `candidate` inside one owning class.
///
/// While the candidate is already claimed in the class's used-name set, a
/// numeric suffix is appended. The counter is scoped by
/// `(owning class, candidate base)`, so within one class every reserved name
/// is distinct by construction, and the sequence of suffixes for a given
/// base is deterministic (`x`, `x_0`, `x_1`, ...).
pub fn reserve(
    used: &mut HashSet<String>,
    counters: &mut HashMap<(String, String), u32>,
    owner: &str,
    candidate: &str,
) -> String {
    let mut name = candidate.to_string();
    while used.contains(&name) {
        let counter = counters
            .entry((owner.to_string(), candidate.to_string()))
            .or_insert(0);
        name = format!("{}_{}", candidate, counter);
        *counter += 1;
    }
    used.insert(name.clone());
    name
}
