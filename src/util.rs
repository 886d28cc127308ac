//! Small utility helpers used across modules.

use chrono::Utc;

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Wall clock in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
  Utc::now().timestamp_millis()
}

/// `part / whole` as a whole percentage, rounded half up. Zero when `whole` is 0.
pub fn percent(part: i64, whole: i64) -> u32 {
  if whole <= 0 {
    return 0;
  }
  let p = (part.max(0) as f64 / whole as f64) * 100.0;
  p.round() as u32
}

/// Log-safe truncation for user-provided strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}
