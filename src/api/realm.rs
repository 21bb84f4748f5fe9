//! Cached realm metadata and asset URL templates.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset type key for champion images in the realm version table.
const CHAMPION_ASSET: &str = "champion";
/// Asset type key for profile icons in the realm version table.
const PROFILE_ICON_ASSET: &str = "profileicon";

/// Platform metadata describing where and at which version static assets
/// are published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    /// Base URL of the asset CDN
    pub cdn: String,
    /// Current overall asset version
    pub v: String,
    /// Per asset type versions
    #[serde(default)]
    pub n: HashMap<String, String>,
    /// Default locale
    #[serde(default)]
    pub l: Option<String>,
    /// Highest valid profile icon id
    #[serde(default, rename = "profileiconmax")]
    pub profile_icon_max: Option<u32>,
}

impl Realm {
    /// The published version of an asset type, falling back to the
    /// overall version.
    pub fn asset_version(&self, asset: &str) -> &str {
        self.n.get(asset).map(String::as_str).unwrap_or(&self.v)
    }

    /// URL of the square icon for a champion key such as `Annie`.
    pub fn champion_icon_url(&self, champion_key: &str) -> String {
        format!(
            "{}/{}/img/champion/{}.png",
            self.cdn.trim_end_matches('/'),
            self.asset_version(CHAMPION_ASSET),
            champion_key
        )
    }

    /// URL of a profile icon.
    pub fn profile_icon_url(&self, icon_id: u32) -> String {
        format!(
            "{}/{}/img/profileicon/{}.png",
            self.cdn.trim_end_matches('/'),
            self.asset_version(PROFILE_ICON_ASSET),
            icon_id
        )
    }
}
