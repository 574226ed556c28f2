//! Generation prompt for a topic.

use crate::config::Prompts;
use crate::domain::QUIZ_LENGTH;
use crate::util::fill_template;

pub fn build_generation_prompt(prompts: &Prompts, topic: &str) -> String {
  let count = QUIZ_LENGTH.to_string();
  fill_template(&prompts.quiz_generation_template, &[("topic", topic), ("count", &count)])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_prompt_names_topic_count_and_schema() {
    let p = build_generation_prompt(&Prompts::default(), "Photosynthesis");
    assert!(p.contains("'Photosynthesis'"));
    assert!(p.contains("10-question"));
    assert!(p.contains("\"questions\""));
    assert!(p.contains("\"options\""));
    assert!(p.contains("\"answer\""));
    assert!(!p.contains("{count}"));
  }

  #[test]
  fn topic_containing_a_placeholder_is_kept_verbatim() {
    let p = build_generation_prompt(&Prompts::default(), "{count} sorting algorithms");
    assert!(p.contains("'{count} sorting algorithms'"), "{p}");
  }
}
