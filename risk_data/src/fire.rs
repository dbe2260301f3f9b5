use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The fire department models two scenarios. Every blockage and score column exists once per
/// size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireSize {
    Small,
    Big,
}

impl FireSize {
    pub fn all() -> Vec<FireSize> {
        vec![FireSize::Small, FireSize::Big]
    }

    /// How the size appears in URLs and column names.
    pub fn key(self) -> &'static str {
        match self {
            FireSize::Small => "small",
            FireSize::Big => "big",
        }
    }

    /// The radius around a building that a fire of this size blocks, in degrees. The buffer is
    /// computed on raw latitude/longitude pairs.
    pub fn radius_degrees(self) -> f64 {
        match self {
            FireSize::Small => 10.0 / 100_000.0,
            FireSize::Big => 25.0 / 100_000.0,
        }
    }
}

impl fmt::Display for FireSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for FireSize {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<FireSize> {
        match x {
            "small" => Ok(FireSize::Small),
            "big" => Ok(FireSize::Big),
            _ => bail!("Unknown fire size {:?}; must be small or big", x),
        }
    }
}

/// Which flavor of risk score to color buildings by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Default,
    Residential,
    Roads,
}

impl ScoreType {
    pub fn all() -> Vec<ScoreType> {
        vec![ScoreType::Default, ScoreType::Residential, ScoreType::Roads]
    }

    /// How the score type appears in URLs.
    pub fn key(self) -> &'static str {
        match self {
            ScoreType::Default => "default",
            ScoreType::Residential => "residential",
            ScoreType::Roads => "roads",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ScoreType::Default => "all buildings and infrastructure",
            ScoreType::Residential => "residential buildings",
            ScoreType::Roads => "roads and public transport",
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for ScoreType {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> Result<ScoreType> {
        match x {
            "default" => Ok(ScoreType::Default),
            "residential" => Ok(ScoreType::Residential),
            "roads" | "road" => Ok(ScoreType::Roads),
            _ => bail!(
                "Unknown score type {:?}; must be default, residential, or roads",
                x
            ),
        }
    }
}
