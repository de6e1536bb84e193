use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::range::Window;
use crate::stats::{Position, SeasonSnapshot};

/// Value-table column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Points,
    Price,
    Ppm,
    Selected,
    Template,
    Differential,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "points" => Ok(SortKey::Points),
            "price" => Ok(SortKey::Price),
            "ppm" => Ok(SortKey::Ppm),
            "selected" => Ok(SortKey::Selected),
            "template" => Ok(SortKey::Template),
            "differential" => Ok(SortKey::Differential),
            other => anyhow::bail!(
                "unknown sort key '{}' (points, price, ppm, selected, template, differential)",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Everything the value table needs, fixed for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRequest {
    pub team: Option<String>,
    pub position: Option<Position>,
    pub window: Window,
    pub sort: SortKey,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub player_id: u32,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub points: i64,
    pub price: f64,
    pub selected_pct: f64,
    pub points_per_million: f64,
    pub template_value: f64,
    pub differential_value: f64,
}

impl ValueRow {
    fn sort_value(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Points => self.points as f64,
            SortKey::Price => self.price,
            SortKey::Ppm => self.points_per_million,
            SortKey::Selected => self.selected_pct,
            SortKey::Template => self.template_value,
            SortKey::Differential => self.differential_value,
        }
    }
}

/// Points per million, weighted by ownership (template) or by its complement
/// (differential). Returns (ppm, template, differential).
pub fn value_metrics(points: i64, price: f64, selected_pct: f64) -> (f64, f64, f64) {
    let ppm = if price > 0.0 { points as f64 / price } else { 0.0 };
    let owned = selected_pct / 100.0;
    (ppm, ppm * owned, ppm * (1.0 - owned))
}

/// Build the GW-range value table for every player matching the request.
///
/// Players whose position code is unrecognized are skipped with a warning.
pub fn build_value_table(snapshot: &SeasonSnapshot, request: &TableRequest) -> Vec<ValueRow> {
    let mut rows: Vec<ValueRow> = snapshot
        .elements
        .iter()
        .filter_map(|player| {
            let position = match player.position() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(player = %player.web_name, "skipping player: {}", e);
                    return None;
                }
            };
            if request.position.is_some_and(|p| p != position) {
                return None;
            }

            let team = snapshot.team_name(player.team).unwrap_or_default().to_string();
            if let Some(ref wanted) = request.team {
                if !team.eq_ignore_ascii_case(wanted.trim()) {
                    return None;
                }
            }

            let points: i64 = snapshot
                .history(player.id)
                .iter()
                .filter(|r| request.window.contains(r.gameweek))
                .map(|r| r.total_points as i64)
                .sum();
            let price = player.price();
            let selected_pct = player.selected_by_percent;
            let (ppm, template, differential) = value_metrics(points, price, selected_pct);

            Some(ValueRow {
                player_id: player.id,
                name: player.web_name.clone(),
                team,
                position,
                points,
                price,
                selected_pct,
                points_per_million: ppm,
                template_value: template,
                differential_value: differential,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        let primary = a
            .sort_value(request.sort)
            .partial_cmp(&b.sort_value(request.sort))
            .unwrap_or(Ordering::Equal);
        let primary = match request.order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };
        // Tie-breaker: name ascending regardless of order
        primary.then_with(|| a.name.cmp(&b.name))
    });

    tracing::debug!(rows = rows.len(), window = %request.window, "built value table");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SeasonSnapshot {
        serde_json::from_str(
            r#"{
            "teams": [
                {"id": 1, "name": "Arsenal", "short_name": "ARS"},
                {"id": 2, "name": "Chelsea", "short_name": "CHE"}
            ],
            "elements": [
                {"id": 1, "web_name": "Raya", "team": 1, "element_type": 1,
                 "now_cost": 50, "selected_by_percent": "20.0"},
                {"id": 2, "web_name": "Saka", "team": 1, "element_type": 3,
                 "now_cost": 100, "selected_by_percent": "50.0"},
                {"id": 3, "web_name": "Palmer", "team": 2, "element_type": 3,
                 "now_cost": 100, "selected_by_percent": "10.0"},
                {"id": 4, "web_name": "Ghost", "team": 2, "element_type": 9,
                 "now_cost": 40, "selected_by_percent": "0.1"}
            ],
            "histories": {
                "1": [{"round": 1, "total_points": 6}, {"round": 2, "total_points": 2}],
                "2": [{"round": 1, "total_points": 10}, {"round": 2, "total_points": 5}],
                "3": [{"round": 1, "total_points": 2}, {"round": 2, "total_points": 13}]
            }
        }"#,
        )
        .unwrap()
    }

    fn request(window: Window) -> TableRequest {
        TableRequest {
            team: None,
            position: None,
            window,
            sort: SortKey::Points,
            order: SortOrder::Descending,
        }
    }

    #[test]
    fn test_value_metrics() {
        let (ppm, template, differential) = value_metrics(20, 10.0, 25.0);
        assert_eq!(ppm, 2.0);
        assert_eq!(template, 0.5);
        assert_eq!(differential, 1.5);
    }

    #[test]
    fn test_value_metrics_zero_price() {
        assert_eq!(value_metrics(20, 0.0, 25.0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_points_in_window() {
        let rows = build_value_table(&snapshot(), &request(Window::new(2, 2)));
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Palmer", "Saka", "Raya"]);
        assert_eq!(rows[0].points, 13);
    }

    #[test]
    fn test_invalid_position_skipped() {
        let rows = build_value_table(&snapshot(), &request(Window::new(1, 38)));
        assert!(rows.iter().all(|r| r.name != "Ghost"));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_filters() {
        let mut req = request(Window::new(1, 38));
        req.team = Some("arsenal".to_string());
        let rows = build_value_table(&snapshot(), &req);
        assert_eq!(rows.len(), 2);

        req.position = Some(Position::Goalkeeper);
        let rows = build_value_table(&snapshot(), &req);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Raya");
    }

    #[test]
    fn test_sort_ascending_ties_by_name() {
        let mut req = request(Window::new(1, 38));
        req.sort = SortKey::Points;
        req.order = SortOrder::Ascending;
        // Raya 8, Saka 15, Palmer 15
        let rows = build_value_table(&snapshot(), &req);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Raya", "Palmer", "Saka"]);
    }

    #[test]
    fn test_sort_by_differential() {
        let mut req = request(Window::new(1, 38));
        req.sort = SortKey::Differential;
        let rows = build_value_table(&snapshot(), &req);
        // Palmer 1.5 * 0.9, Raya 1.6 * 0.8, Saka 1.5 * 0.5
        assert_eq!(rows[0].name, "Palmer");
        assert_eq!(rows[2].name, "Saka");
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("PPM".parse::<SortKey>().unwrap(), SortKey::Ppm);
        let err = "value".parse::<SortKey>().unwrap_err();
        assert!(err.to_string().contains("unknown sort key 'value'"));
    }
}
