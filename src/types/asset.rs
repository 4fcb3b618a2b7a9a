use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// The media kinds an agent reply can carry.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// A still picture.
    #[default]
    Image,

    /// A playable clip.
    Video,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Video => write!(f, "video"),
        }
    }
}

/// A media attachment accompanying an agent reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Whether this is an image or a video.
    #[serde(rename = "type", default)]
    pub kind: AssetKind,

    /// Location of the asset, usually relative to the backend base URL.
    pub asset_url: String,

    /// Catalog identifier of the asset, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
}

impl Asset {
    /// Creates a new asset reference.
    pub fn new(kind: AssetKind, asset_url: impl Into<String>) -> Self {
        Self {
            kind,
            asset_url: asset_url.into(),
            image_id: None,
        }
    }

    /// Returns true if the asset has a location that can be rendered.
    pub fn is_renderable(&self) -> bool {
        !self.asset_url.trim().is_empty()
    }

    /// Resolves the asset location against the backend base URL.
    ///
    /// Relative locations are appended to the base, keeping any path prefix
    /// the base carries. Absolute URLs are returned unchanged.
    pub fn resolve(&self, base: &Url) -> Result<Url> {
        let location = self.asset_url.trim();
        if location.is_empty() {
            return Err(Error::validation(
                "asset has no location",
                Some("asset_url".to_string()),
            ));
        }
        if let Ok(absolute) = Url::parse(location) {
            return Ok(absolute);
        }
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(location.trim_start_matches('/'))?)
    }
}
