//! String co-renaming, a textual heuristic rather than alias analysis.
//!
//! Obfuscated code frequently carries class and method names as string
//! literals (reflection, logging, resource lookups). Literals that exactly
//! equal a renamed class's dotted name or a renamed method's original name
//! are substituted with the new name; everything else is left alone.

use crate::context::RenameContext;

/// Fold one class's literals into the run-wide substitution map.
///
/// Only the first match for a distinct literal is recorded; identity
/// replacements are never recorded. Purely additive: unmatched literals are
/// untouched.
pub fn analyze_literals<'a, I>(ctx: &mut RenameContext, literals: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for literal in literals {
        if ctx.has_string(literal) {
            continue;
        }
        if let Some(replacement) = find_replacement(ctx, literal) {
            if replacement != literal {
                ctx.record_string(literal, replacement);
            }
        }
    }
}

/// Class records are consulted first (by dotted-name descriptor), then
/// method records (by plain original name). Class replacements go through
/// the consistency cache, so the guard and exclusions suppress them exactly
/// as they do for real type references.
fn find_replacement(ctx: &mut RenameContext, literal: &str) -> Option<String> {
    if ctx.records().find_class(literal).is_some() {
        return Some(ctx.resolve_class(literal));
    }
    ctx.records()
        .find_method_named(literal)
        .map(|r| r.new_name.clone())
}
