//! Fragment utilities: normalization and page/payload splitting
//!
//! Every function here is **pure** and returns slices of its input where it can.
//!
//! A fragment looks like `#[marker]PageKey[/token]*`, for example
//! `#!paramtest/John-Rizzo-Belgium/ssn=xxxxxx`.

/// Separator between the page key and each payload token
pub const SEPARATOR: char = '/';

/// Leading character of a URI fragment
pub const FRAGMENT_PREFIX: char = '#';

/// Default marker put before the page key of crawlable pages
pub const CRAWLABLE_MARKER: &str = "!";

/// Separates key from value in a named token
pub const KEY_VALUE_SEPARATOR: char = '=';

/// A fragment split into its page key and parameter payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentParts<'a> {
    /// Page segment, as typed (lookup lowercases it)
    pub page_key: &'a str,
    /// Everything after the first separator, possibly empty
    pub payload: &'a str,
    /// Whether the crawlable marker preceded the page key
    pub marked_crawlable: bool,
}

/// Strips the `#` prefix and leading/trailing separators
///
/// Normalization only narrows the input slice. Inner empty tokens (`a//b`)
/// are preserved: they are positional slots.
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::fragment::normalize_fragment;
///
/// assert_eq!(normalize_fragment("#dash/"), "dash");
/// assert_eq!(normalize_fragment("/ticket/ABC"), "ticket/ABC");
/// assert_eq!(normalize_fragment("a//b"), "a//b");
/// ```
pub fn normalize_fragment(fragment: &str) -> &str {
    fragment
        .strip_prefix(FRAGMENT_PREFIX)
        .unwrap_or(fragment)
        .trim_start_matches(SEPARATOR)
        .trim_end_matches(SEPARATOR)
}

/// Splits a fragment into page key and payload
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::fragment::split_fragment;
///
/// let parts = split_fragment("#!ParamTest/abc/ssn=1", "!");
/// assert_eq!(parts.page_key, "ParamTest");
/// assert_eq!(parts.payload, "abc/ssn=1");
/// assert!(parts.marked_crawlable);
///
/// let parts = split_fragment("", "!");
/// assert_eq!(parts.page_key, "");
/// assert_eq!(parts.payload, "");
/// ```
pub fn split_fragment<'a>(fragment: &'a str, crawlable_marker: &str) -> FragmentParts<'a> {
    let body = normalize_fragment(fragment);

    let (rest, marked_crawlable) = match body.strip_prefix(crawlable_marker) {
        Some(rest) if !crawlable_marker.is_empty() => (rest.trim_start_matches(SEPARATOR), true),
        _ => (body, false),
    };

    let (page_key, payload) = match rest.split_once(SEPARATOR) {
        Some((page, payload)) => (page, payload),
        None => (rest, ""),
    };

    FragmentParts {
        page_key,
        payload,
        marked_crawlable,
    }
}

/// Joins a page key and a payload into a fragment body (no `#`)
pub fn join_fragment(page_key: &str, payload: &str) -> String {
    let payload = payload.trim_start_matches(SEPARATOR);
    if payload.is_empty() {
        page_key.to_string()
    } else {
        format!("{}{}{}", page_key, SEPARATOR, payload)
    }
}

/// Whether `key` can be used as a page segment
///
/// # Rules
///
/// - Must not be empty or blank
/// - Must not contain the separator, `=`, `#` or whitespace
/// - Must not start with the default crawlable marker `!`
pub fn is_valid_uri_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with(CRAWLABLE_MARKER)
        && !key.chars().any(|c| {
            c == SEPARATOR || c == KEY_VALUE_SEPARATOR || c == FRAGMENT_PREFIX || c.is_whitespace()
        })
}

/// Whether `text` can be written into a payload token and read back
/// unchanged
pub fn is_token_safe(text: &str) -> bool {
    !text.contains(SEPARATOR) && !text.contains(KEY_VALUE_SEPARATOR)
}
