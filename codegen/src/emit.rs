//! Shared formatting helpers. Purely cosmetic — generated-text layout is not
//! a semantic contract.

use heck::ToUpperCamelCase;

/// Longest name in a set, for columnar alignment.
pub fn widest<'a, I>(names: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(str::len).max().unwrap_or(0)
}

/// Right-pad `name` to `width` characters.
pub fn pad(name: &str, width: usize) -> String {
    format!("{name}{}", " ".repeat(width.saturating_sub(name.len())))
}

/// One aligned struct member line: `    name: Type,`.
pub fn member(name: &str, ty: &str, width: usize) -> String {
    format!("    {} {},\n", pad(&format!("{name}:"), width + 1), ty)
}

/// Rust type name for a schema component name, e.g. `fx_rate` -> `FxRate`.
pub fn type_name(raw: &str) -> String {
    raw.to_upper_camel_case()
}

/// Finder method name for an index alias, e.g. `by_id` -> `find_by_id`.
pub fn finder_name(alias: &str) -> String {
    format!("find_{alias}")
}
