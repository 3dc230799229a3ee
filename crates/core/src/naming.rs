//! Naming conventions shared by discovery and the category processor.
//!
//! Both functions are pure string transformations with an explicit fallback.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// Matches `pro-<word>-svg-icons` / `free-<word>-svg-icons` package names.
static STYLE_PACKAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:pro|free)-(\w+)-svg-icons").expect("valid style regex"));

/// Derives the short, human-facing name of a category.
///
/// `pro-regular-svg-icons` becomes `regular`, `free-solid-svg-icons` becomes
/// `solid`. Identifiers that do not follow the package naming scheme are
/// returned unchanged.
pub fn short_name(category: &str) -> String {
    STYLE_PACKAGE
        .captures(category)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| category.to_string())
}

/// Derives an icon id from a source file name by removing the leading
/// `prefix` and the trailing `extension`.
///
/// Either part is left in place when it is absent, so a file that does not
/// follow the convention still yields a stable id.
pub fn icon_id(file_name: &str, prefix: &str, extension: &str) -> String {
    let stem = file_name.strip_prefix(prefix).unwrap_or(file_name);
    stem.strip_suffix(extension).unwrap_or(stem).to_string()
}

/// Whether `file_name` follows the `<prefix><stem><extension>` convention with
/// a non-empty stem.
pub fn matches_convention(file_name: &str, prefix: &str, extension: &str) -> bool {
    file_name.len() > prefix.len() + extension.len()
        && file_name.starts_with(prefix)
        && file_name.ends_with(extension)
}
