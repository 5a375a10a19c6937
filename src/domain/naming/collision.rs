use std::collections::HashSet;

/// Splits `name` at its last `.`; the extension keeps the dot and is empty when there is none.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) => name.split_at(index),
        None => (name, ""),
    }
}

/// Returns `base` if it is free, otherwise the first free `stem(n)ext` for n = 1, 2, ...
///
/// Existing `(n)` suffixes are not parsed: `a(1).txt` becomes `a(1)(1).txt`.
pub fn resolve_collision(base: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }

    let (stem, extension) = split_extension(base);
    // Each taken candidate is one element of `existing`, so a free one turns up within
    // `existing.len() + 1` candidates.
    (1..=existing.len() + 1)
        .map(|counter| format!("{}({}){}", stem, counter, extension))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| format!("{}({}){}", stem, existing.len() + 1, extension))
}
