//! Loading quiz configuration (paths + title) from TOML and the environment.
//!
//! Every field has a default, so an absent or broken config file still yields a
//! usable `QuizConfig`. Env overrides are applied last.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuizConfig {
  pub title: String,
  pub intro: String,
  /// CSV question source.
  pub questions_path: PathBuf,
  /// Base directory for question, placeholder and result images.
  pub asset_dir: PathBuf,
  pub placeholder_image: String,
  /// SPA served as the router fallback.
  pub static_dir: PathBuf,
  /// HTTP sessions idle for longer than this are discarded.
  pub session_ttl_secs: u64,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      title: "MZ 테스트".into(),
      intro: "MZ 신조어/밈 이해도를 확인해보세요. 이름을 입력하면 결과에 표시됩니다.".into(),
      questions_path: PathBuf::from("mz_test.csv"),
      asset_dir: PathBuf::from("."),
      placeholder_image: "placeholder_light_gray_block.png".into(),
      static_dir: PathBuf::from("./static"),
      session_ttl_secs: 30 * 60,
    }
  }
}

/// Build the config from QUIZ_CONFIG_PATH (if set) plus QUIZ_CSV_PATH / QUIZ_ASSET_DIR /
/// QUIZ_SESSION_TTL_SECS.
pub fn load_quiz_config_from_env() -> QuizConfig {
  let mut cfg = std::env::var("QUIZ_CONFIG_PATH")
    .ok()
    .and_then(|path| load_quiz_config(&path))
    .unwrap_or_default();

  if let Ok(p) = std::env::var("QUIZ_CSV_PATH") {
    cfg.questions_path = PathBuf::from(p);
  }
  if let Ok(p) = std::env::var("QUIZ_ASSET_DIR") {
    cfg.asset_dir = PathBuf::from(p);
  }
  if let Some(ttl) = std::env::var("QUIZ_SESSION_TTL_SECS").ok().and_then(|v| v.parse::<u64>().ok()) {
    cfg.session_ttl_secs = ttl;
  }
  cfg
}

/// Read a TOML config file. On any IO/parse error, logs and returns None.
pub fn load_quiz_config(path: &str) -> Option<QuizConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "mzquiz_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "mzquiz_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "mzquiz_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
