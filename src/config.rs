//! Loading agent configuration (prompt templates) from TOML.
//!
//! See `AgentConfig` and `Prompts` for expected schema:
//!
//! ```toml
//! [prompts]
//! quiz_generation_template = "Write {count} questions about {topic} ..."
//! ```

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AgentConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts sent to the model gateway. Placeholders: `{topic}`, `{count}`.
/// The wording can be tuned in TOML; the JSON schema it asks for cannot change
/// without breaking the quiz response parser.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub quiz_generation_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_generation_template: concat!(
        "Generate a {count}-question multiple-choice quiz on '{topic}'. ",
        "Output MUST be a valid JSON object and nothing else, shaped exactly like ",
        "{\"questions\": [{\"question\": string, \"options\": [string, string, string, string], \"answer\": string}]}. ",
        "Return exactly {count} entries in \"questions\". Each \"options\" array holds 4 distinct choices, ",
        "and \"answer\" MUST be copied verbatim from its \"options\"."
      )
      .into(),
    }
  }
}

/// Attempt to load `AgentConfig` from AGENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_agent_config_from_env() -> Option<AgentConfig> {
  let path = std::env::var("AGENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_agent_config(&s) {
      Ok(cfg) => {
        info!(target: "studybuddy_backend", %path, "Loaded agent config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "studybuddy_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "studybuddy_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_agent_config(s: &str) -> Result<AgentConfig, toml::de::Error> {
  toml::from_str::<AgentConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_falls_back_to_default_prompts() {
    let cfg = parse_agent_config("").unwrap();
    assert!(cfg.prompts.quiz_generation_template.contains("{topic}"));
    assert!(cfg.prompts.quiz_generation_template.contains("{count}"));
  }

  #[test]
  fn prompts_table_overrides_template() {
    let cfg = parse_agent_config("[prompts]\nquiz_generation_template = \"Quiz me on {topic}\"\n").unwrap();
    assert_eq!(cfg.prompts.quiz_generation_template, "Quiz me on {topic}");
  }

  #[test]
  fn malformed_toml_is_an_error() {
    assert!(parse_agent_config("[prompts\n").is_err());
  }
}
