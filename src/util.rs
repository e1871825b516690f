//! Small utility helpers used across modules.

/// Byte-order mark that survives line splitting when a file was saved as "UTF-8 with BOM".
pub const BOM: char = '\u{feff}';

/// Remove any leading byte-order marks.
pub fn strip_bom(s: &str) -> &str {
  s.trim_start_matches(BOM)
}

/// True if the line holds nothing but whitespace.
pub fn is_blank(s: &str) -> bool {
  s.trim().is_empty()
}

/// Log-safe truncation for user-provided strings.
/// Cuts on a char boundary so Hangul input never panics.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let count = s.chars().count();
  if count <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} chars total)", head, count)
  }
}
