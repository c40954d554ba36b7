//! Domain query normalization and zone extraction.
//!
//! Turns whatever the user typed into a comparable domain string and derives
//! the registry zone used for pricing lookups.

use regex::Regex;
use std::sync::LazyLock;

/// Separators between words of a free-text query.
static QUERY_TOKEN_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("valid separator regex"));

/// Normalizes a raw query into a canonical domain string.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Surrounding whitespace is trimmed
/// 2. **Case**: Converted to lowercase
/// 3. **Protocol**: Leading `http://` or `https://` is removed
/// 4. **Prefix**: Leading `www.` is removed
/// 5. **Path**: A single trailing `/` is removed, then everything from the
///    first remaining `/` is cut off
///
/// The rules are applied until the value stops changing, so the result is a
/// fixed point: normalizing it again yields the same string.
///
/// Never fails; garbage in yields a (possibly empty) string out.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("HTTPS://www.Example.com/path"), "example.com");
/// assert_eq!(normalize("   "), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_pass(raw);

    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut value = lowered.as_str();
    value = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .unwrap_or(value);
    value = value.strip_prefix("www.").unwrap_or(value);
    value = value.strip_suffix('/').unwrap_or(value);

    if let Some(slash) = value.find('/') {
        value = &value[..slash];
    }

    value.trim().to_string()
}

/// Extracts the registry zone (TLD) from a normalized domain.
///
/// Takes the last label, or the last two labels when the second-to-last label
/// is at most three characters long and the domain has at least three labels
/// (`example.co.jp` → `.co.jp`). Returns an empty string for single-label input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(extract_zone("example.com"), ".com");
/// assert_eq!(extract_zone("example.co.jp"), ".co.jp");
/// assert_eq!(extract_zone("example"), "");
/// ```
pub fn extract_zone(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return String::new();
    }

    let last = labels[labels.len() - 1];
    let second_last = labels[labels.len() - 2];

    if labels.len() >= 3 && second_last.chars().count() <= 3 {
        format!(".{}.{}", second_last, last)
    } else {
        format!(".{}", last)
    }
}

/// Returns the domain with its zone removed (`foo.co.uk` → `foo`).
pub fn strip_zone(domain: &str) -> &str {
    let zone = extract_zone(domain);
    domain.strip_suffix(zone.as_str()).unwrap_or(domain)
}

/// Builds a candidate in `zone` from the first word of a normalized query.
///
/// The first whitespace/comma separated token is taken, any zone it already
/// carries is stripped and `zone` is appended. Returns `None` when the query
/// has no usable token.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(regional_candidate("foo bar", ".ru"), Some("foo.ru".to_string()));
/// assert_eq!(regional_candidate("foo.com", ".ru"), Some("foo.ru".to_string()));
/// ```
pub fn regional_candidate(normalized_query: &str, zone: &str) -> Option<String> {
    let token = QUERY_TOKEN_SEPARATOR
        .split(normalized_query)
        .find(|t| !t.is_empty())?;

    let base = strip_zone(token).trim_end_matches('.');
    if base.is_empty() {
        return None;
    }

    Some(format!("{}{}", base, zone))
}
