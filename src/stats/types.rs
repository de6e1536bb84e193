use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;
use std::fmt;
use std::str::FromStr;

use crate::scoring::ScoringError;

/// One player's statistics for one gameweek.
///
/// Field names follow the public feed's history rows, so a row deserializes
/// directly. Every field is optional in the source: absent or `null` values
/// become 0 (or `false`), never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StatRecord {
    #[serde(rename = "round", deserialize_with = "deserialize_default_from_null")]
    pub gameweek: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub minutes: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub goals_scored: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub assists: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub clean_sheets: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub goals_conceded: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub saves: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub penalties_saved: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub penalties_missed: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub yellow_cards: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub red_cards: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub own_goals: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub bonus: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub defensive_contribution: u32,
    #[serde(rename = "opponent_team", deserialize_with = "deserialize_default_from_null")]
    pub opponent: u32,
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub was_home: bool,
    /// Points the provider awarded for this gameweek (may be negative).
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub total_points: i32,
}

impl StatRecord {
    /// Empty record for a gameweek; handy as a struct-update base.
    pub fn for_gameweek(gameweek: u32) -> Self {
        Self {
            gameweek,
            ..Self::default()
        }
    }
}

/// Playing position. Decides which scoring categories exist for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Short code used by the feed and in tables ("GK", "DEF", "MID", "FWD")
    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" | "GKP" | "GOALKEEPER" => Ok(Position::Goalkeeper),
            "DEF" | "DEFENDER" => Ok(Position::Defender),
            "MID" | "MIDFIELDER" => Ok(Position::Midfielder),
            "FWD" | "FORWARD" => Ok(Position::Forward),
            _ => Err(ScoringError::InvalidPosition(s.to_string())),
        }
    }
}

/// Feed `element_type` code: 1 = GK, 2 = DEF, 3 = MID, 4 = FWD.
impl TryFrom<u8> for Position {
    type Error = ScoringError;

    fn try_from(element_type: u8) -> Result<Self, Self::Error> {
        match element_type {
            1 => Ok(Position::Goalkeeper),
            2 => Ok(Position::Defender),
            3 => Ok(Position::Midfielder),
            4 => Ok(Position::Forward),
            other => Err(ScoringError::InvalidPosition(format!("element_type {}", other))),
        }
    }
}
