//! Tag name normalisation

use std::collections::BTreeSet;

/// Normalise a free-form tag list
///
/// Trims every name, drops empties and removes duplicates. Comparison is
/// case-sensitive, so `"A"` and `"a"` are distinct tags. The result is sorted.
///
/// # Examples
///
/// ```
/// use vault_domain::normalize_tags;
///
/// let tags = normalize_tags(["A", "a ", "B", "  ", "A"]);
/// assert_eq!(tags, vec!["A", "B", "a"]);
/// ```
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
