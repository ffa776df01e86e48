//! Text rendering utilities for human-friendly error messages.
//!
//! Provides helpers to format resolution chains and "did you mean?"
//! suggestions for unknown entry names.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use rabita_support::rendering::render_chain;
///
/// let chain = vec!["car", "engine", "car"];
/// assert_eq!(render_chain(&chain), "car → engine → car");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Generates "did you mean?" suggestions for a requested entry name.
///
/// Entry names are caller-chosen strings, so the scoring is deliberately
/// simple: exact match up to case, then substring containment, then a
/// shared prefix of at least three characters.
pub fn suggest_similar(
    requested: &str,
    available: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let requested_lower = requested.to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();

            if name_lower == requested_lower {
                return Some((name, 100));
            }

            if name_lower.contains(&requested_lower)
                || requested_lower.contains(&name_lower)
            {
                return Some((name, 80));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            if common >= 3 {
                return Some((name, common * 10));
            }

            None
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
