//! Regions served by the API and their platform identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RiftwatchError;

/// A regional shard of the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Br,
    Eune,
    Euw,
    Jp,
    Kr,
    Lan,
    Las,
    #[default]
    Na,
    Oce,
    Ru,
    Tr,
    Pbe,
}

impl Region {
    /// Every known region.
    pub const ALL: [Region; 12] = [
        Region::Br,
        Region::Eune,
        Region::Euw,
        Region::Jp,
        Region::Kr,
        Region::Lan,
        Region::Las,
        Region::Na,
        Region::Oce,
        Region::Ru,
        Region::Tr,
        Region::Pbe,
    ];

    /// The short lowercase name used in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Br => "br",
            Region::Eune => "eune",
            Region::Euw => "euw",
            Region::Jp => "jp",
            Region::Kr => "kr",
            Region::Lan => "lan",
            Region::Las => "las",
            Region::Na => "na",
            Region::Oce => "oce",
            Region::Ru => "ru",
            Region::Tr => "tr",
            Region::Pbe => "pbe",
        }
    }

    /// The platform identifier the observer endpoints expect.
    pub fn platform_id(&self) -> &'static str {
        match self {
            Region::Br => "BR1",
            Region::Eune => "EUN1",
            Region::Euw => "EUW1",
            Region::Jp => "JP1",
            Region::Kr => "KR",
            Region::Lan => "LA1",
            Region::Las => "LA2",
            Region::Na => "NA1",
            Region::Oce => "OC1",
            Region::Ru => "RU",
            Region::Tr => "TR1",
            Region::Pbe => "PBE1",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = RiftwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == lowered)
            .ok_or_else(|| RiftwatchError::Config(format!("unknown region: {}", s)))
    }
}
