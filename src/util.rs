//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// Single pass: substituted values are never scanned again, so a value that
/// itself contains `{key}` is kept verbatim.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(start) = rest.find('{') {
    out.push_str(&rest[..start]);
    let after = &rest[start + 1..];
    let hit = pairs
      .iter()
      .find(|(k, _)| after.starts_with(*k) && after[k.len()..].starts_with('}'));
    match hit {
      Some((k, v)) => {
        out.push_str(v);
        rest = &after[k.len() + 1..];
      }
      None => {
        out.push('{');
        rest = after;
      }
    }
  }
  out.push_str(rest);
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge model responses. Cuts on a char boundary.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{topic} / {count} / {topic}", &[("topic", "Rust"), ("count", "10")]);
    assert_eq!(out, "Rust / 10 / Rust");
  }

  #[test]
  fn substituted_values_are_not_expanded_again() {
    let out = fill_template("Quiz on '{topic}' with {count} questions", &[("topic", "the {count} rule"), ("count", "10")]);
    assert_eq!(out, "Quiz on 'the {count} rule' with 10 questions");
  }

  #[test]
  fn unknown_placeholders_and_json_braces_are_left_alone() {
    let out = fill_template("{\"questions\": [{other}], {topic}", &[("topic", "Rust")]);
    assert_eq!(out, "{\"questions\": [{other}], Rust");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    let s = "ééééé";
    let out = trunc_for_log(s, 3);
    assert!(out.starts_with('é'));
    assert!(out.ends_with("(10 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
