//! ES module entry points for CommonJS icon modules.
//!
//! A bundler given a CommonJS entry emits only a default export. Bundling a
//! small ESM entry that re-exports each assigned name keeps
//! `import { faHouse } from ".../faHouse.js"` working.

use once_cell::sync::Lazy;
use regex_lite::Regex;

/// `exports.name = ...` and `module.exports.name = ...`, not `==`.
static EXPORT_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^\w$.])(?:module\.)?exports\.([A-Za-z_$][\w$]*)\s*=[^=]")
        .expect("valid export assignment regex")
});

/// `Object.defineProperty(exports, "name", ...)`.
static EXPORT_DEFINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"Object\.defineProperty\(\s*(?:module\.)?exports\s*,\s*['"]([A-Za-z_$][\w$]*)['"]"#,
    )
    .expect("valid export define regex")
});

/// Marker property set by transpiled modules; never a real export.
const ES_MODULE_MARKER: &str = "__esModule";

/// Names a CommonJS module assigns on `exports`, in first-seen order.
pub fn commonjs_export_names(source: &str) -> Vec<String> {
    let mut matches: Vec<(usize, &str)> = EXPORT_ASSIGNMENT
        .captures_iter(source)
        .chain(EXPORT_DEFINE.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| (m.start(), m.as_str()))
        .collect();
    matches.sort_by_key(|(start, _)| *start);

    let mut names: Vec<String> = Vec::new();
    for (_, name) in matches {
        if name != ES_MODULE_MARKER && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// An entry module re-exporting `names` from the sibling file `file_name`.
pub fn esm_entry(file_name: &str, names: &[String]) -> String {
    let specifier = serde_json::Value::String(format!("./{}", file_name));
    format!("export {{ {} }} from {};\n", names.join(", "), specifier)
}
