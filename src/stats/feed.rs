use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::{deserialize_default_from_null, deserialize_number_from_string};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::types::{Position, StatRecord};
use crate::scoring::ScoringError;

/// Gameweeks in a full season, used when the snapshot carries no history.
pub const SEASON_GAMEWEEKS: u32 = 38;

/// Offline season snapshot: the static player list plus every player's
/// per-gameweek history, keyed by player id.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SeasonSnapshot {
    pub teams: Vec<TeamEntry>,
    pub elements: Vec<PlayerEntry>,
    pub histories: BTreeMap<u32, Vec<StatRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TeamEntry {
    pub id: u32,
    pub name: String,
    pub short_name: String,
}

/// Static player metadata. Passed through for display only.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerEntry {
    pub id: u32,
    pub web_name: String,
    pub team: u32,
    pub element_type: u8,
    /// Price in tenths of a million
    #[serde(deserialize_with = "deserialize_default_from_null")]
    pub now_cost: u32,
    /// The feed publishes this as a string ("12.3")
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub selected_by_percent: f64,
}

impl PlayerEntry {
    pub fn position(&self) -> Result<Position, ScoringError> {
        Position::try_from(self.element_type)
    }

    /// Current price in millions
    pub fn price(&self) -> f64 {
        self.now_cost as f64 / 10.0
    }
}

impl SeasonSnapshot {
    /// Find a player by display name (case-insensitive).
    pub fn find_player(&self, name: &str) -> Option<&PlayerEntry> {
        let name = name.trim();
        self.elements
            .iter()
            .find(|p| p.web_name.eq_ignore_ascii_case(name))
    }

    /// A player's gameweek history; empty when the snapshot has none.
    pub fn history(&self, player_id: u32) -> &[StatRecord] {
        self.histories
            .get(&player_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn team(&self, team_id: u32) -> Option<&TeamEntry> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    pub fn team_name(&self, team_id: u32) -> Option<&str> {
        self.team(team_id).map(|t| t.name.as_str())
    }

    /// Short name for labels, falling back to the full name.
    pub fn team_short_name(&self, team_id: u32) -> Option<&str> {
        self.team(team_id).map(|t| {
            if t.short_name.is_empty() {
                t.name.as_str()
            } else {
                t.short_name.as_str()
            }
        })
    }

    /// Highest gameweek present in any history.
    pub fn last_gameweek(&self) -> u32 {
        self.histories
            .values()
            .flatten()
            .map(|r| r.gameweek)
            .max()
            .unwrap_or(SEASON_GAMEWEEKS)
    }
}

/// Load a season snapshot from a JSON file
pub fn load_snapshot(path: &Path) -> Result<SeasonSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read season data at {}", path.display()))?;

    let snapshot: SeasonSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse season data: invalid JSON in {}", path.display()))?;

    tracing::debug!(
        players = snapshot.elements.len(),
        teams = snapshot.teams.len(),
        histories = snapshot.histories.len(),
        "loaded season snapshot from {}",
        path.display()
    );

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const SAMPLE: &str = r#"{
        "teams": [
            {"id": 1, "name": "Arsenal", "short_name": "ARS"},
            {"id": 2, "name": "Brentford", "short_name": ""}
        ],
        "elements": [
            {"id": 10, "web_name": "Saka", "team": 1, "element_type": 3,
             "now_cost": 101, "selected_by_percent": "35.2"},
            {"id": 11, "web_name": "Flekken", "team": 2, "element_type": 1,
             "now_cost": 45, "selected_by_percent": 4.1}
        ],
        "histories": {
            "10": [
                {"round": 1, "minutes": 90, "total_points": 8},
                {"round": 2, "minutes": 75, "total_points": 2}
            ]
        }
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.elements.len(), 2);
        assert_eq!(snapshot.history(10).len(), 2);
        assert!(snapshot.history(11).is_empty());
    }

    #[test]
    fn test_selected_by_percent_string_or_number() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert!((snapshot.elements[0].selected_by_percent - 35.2).abs() < 1e-9);
        assert!((snapshot.elements[1].selected_by_percent - 4.1).abs() < 1e-9);
    }

    #[test]
    fn test_find_player_case_insensitive() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.find_player("saka").unwrap().id, 10);
        assert!(snapshot.find_player("Haaland").is_none());
    }

    #[test]
    fn test_player_price_and_position() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        let saka = &snapshot.elements[0];
        assert!((saka.price() - 10.1).abs() < 1e-9);
        assert_eq!(saka.position().unwrap(), Position::Midfielder);
    }

    #[test]
    fn test_team_short_name_fallback() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.team_short_name(1), Some("ARS"));
        assert_eq!(snapshot.team_short_name(2), Some("Brentford"));
        assert_eq!(snapshot.team_short_name(99), None);
    }

    #[test]
    fn test_last_gameweek() {
        let snapshot: SeasonSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snapshot.last_gameweek(), 2);
        assert_eq!(SeasonSnapshot::default().last_gameweek(), SEASON_GAMEWEEKS);
    }

    #[test]
    fn test_load_snapshot_from_file() {
        let temp_path = env::temp_dir().join("fpl_breakdown_test_snapshot.json");
        std::fs::write(&temp_path, SAMPLE).unwrap();

        let snapshot = load_snapshot(&temp_path).unwrap();
        assert_eq!(snapshot.teams.len(), 2);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_snapshot_missing_file() {
        let temp_path = env::temp_dir().join("fpl_breakdown_test_missing_snapshot.json");
        let _ = std::fs::remove_file(&temp_path);

        let err = load_snapshot(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Failed to read season data"));
    }
}
