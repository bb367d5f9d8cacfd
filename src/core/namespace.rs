//! Protected platform namespaces that must never be renamed.

/// Prefixes of reserved platform namespaces. A class whose qualified name
/// starts with one of these is returned unchanged by every resolver, even
/// when a rename record happens to target it.
const PROTECTED_PREFIXES: &[&str] = &["java.", "javax.", "android."];

/// Whether `name` (a fully qualified dotted class name) belongs to a
/// protected platform namespace.
pub fn is_protected(name: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
