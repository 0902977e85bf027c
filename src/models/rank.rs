//! Rank tiers, ordered from lowest to highest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competitive rank tier. Derived `Ord` follows declaration order, so
/// `Legend > Grandmaster > ... > Bronze`.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RankTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Legend,
}

impl RankTier {
    /// All tiers, lowest first.
    pub const ALL: [RankTier; 8] = [
        RankTier::Bronze,
        RankTier::Silver,
        RankTier::Gold,
        RankTier::Platinum,
        RankTier::Diamond,
        RankTier::Master,
        RankTier::Grandmaster,
        RankTier::Legend,
    ];

    /// Inclusive lower bound of the tier on the rating scale.
    pub fn base_rating(self) -> u32 {
        match self {
            RankTier::Bronze => 0,
            RankTier::Silver => 900,
            RankTier::Gold => 1200,
            RankTier::Platinum => 1500,
            RankTier::Diamond => 1800,
            RankTier::Master => 2000,
            RankTier::Grandmaster => 2200,
            RankTier::Legend => 2400,
        }
    }

    /// The next tier up, `None` for Legend.
    pub fn next(self) -> Option<RankTier> {
        match self {
            RankTier::Bronze => Some(RankTier::Silver),
            RankTier::Silver => Some(RankTier::Gold),
            RankTier::Gold => Some(RankTier::Platinum),
            RankTier::Platinum => Some(RankTier::Diamond),
            RankTier::Diamond => Some(RankTier::Master),
            RankTier::Master => Some(RankTier::Grandmaster),
            RankTier::Grandmaster => Some(RankTier::Legend),
            RankTier::Legend => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RankTier::Bronze => "bronze",
            RankTier::Silver => "silver",
            RankTier::Gold => "gold",
            RankTier::Platinum => "platinum",
            RankTier::Diamond => "diamond",
            RankTier::Master => "master",
            RankTier::Grandmaster => "grandmaster",
            RankTier::Legend => "legend",
        }
    }
}

impl fmt::Display for RankTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a rank name is not one of the eight tiers.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown rank tier: {0}")]
pub struct UnknownRank(pub String);

impl FromStr for RankTier {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RankTier::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRank(wanted.to_string()))
    }
}
