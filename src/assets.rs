//! Asset lookup for question images and result-tier images.
//!
//! Files are resolved by name against one base directory and only checked for
//! existence. A missing question image falls back to the placeholder; a missing
//! placeholder or tier image simply means no image.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::domain::Tier;

pub const MISSING_IMAGE_CAPTION: &str = "이미지를 찾을 수 없습니다.";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Only image files are ever served from the asset directory.
pub fn is_image_file(name: &str) -> bool {
  Path::new(name)
    .extension()
    .and_then(|e| e.to_str())
    .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
    .unwrap_or(false)
}

/// An image the UI should show, as a name relative to the asset directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRef {
  pub file: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub caption: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AssetResolver {
  base_dir: PathBuf,
  placeholder: String,
}

impl AssetResolver {
  pub fn new(base_dir: impl Into<PathBuf>, placeholder: impl Into<String>) -> Self {
    Self { base_dir: base_dir.into(), placeholder: placeholder.into() }
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  /// True if `name` is a plain relative path that exists under the base directory.
  pub fn exists(&self, name: &str) -> bool {
    let rel = Path::new(name);
    let plain = rel.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    plain && self.base_dir.join(rel).is_file()
  }

  pub fn question_image(&self, image: Option<&str>) -> Option<ImageRef> {
    let name = image.map(str::trim).filter(|s| !s.is_empty())?;
    if self.exists(name) {
      return Some(ImageRef { file: name.to_string(), caption: None });
    }
    warn!(target: "quiz", image = name, "Question image not found");
    if self.exists(&self.placeholder) {
      Some(ImageRef { file: self.placeholder.clone(), caption: Some(MISSING_IMAGE_CAPTION.into()) })
    } else {
      None
    }
  }

  pub fn tier_image(&self, tier: Tier) -> Option<ImageRef> {
    if self.exists(tier.asset()) {
      Some(ImageRef { file: tier.asset().to_string(), caption: None })
    } else {
      warn!(target: "quiz", asset = tier.asset(), "Result image not found");
      None
    }
  }
}
