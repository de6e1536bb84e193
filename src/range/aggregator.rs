use serde::{Deserialize, Serialize};
use std::fmt;

use super::outliers::{high_outliers, weekly_stats, z_score, HIGH_OUTLIER_Z};
use crate::scoring::percent_of;
use crate::stats::StatRecord;

/// Inclusive gameweek range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Window {
    pub start: u32,
    pub end: u32,
}

impl Window {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, gameweek: u32) -> bool {
        gameweek >= self.start && gameweek <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GW {}-{}", self.start, self.end)
    }
}

/// One gameweek in a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameweekRow {
    pub gameweek: u32,
    pub opponent: u32,
    pub was_home: bool,
    pub points: i64,
    pub percent: f64, // Share of the window total, one decimal
    pub z_score: f64,
    pub outlier: bool,
}

impl GameweekRow {
    /// "GW5 vs ARS (H)"; the raw opponent id stands in when no name is known.
    pub fn label(&self, opponent_name: Option<&str>) -> String {
        let venue = if self.was_home { "H" } else { "A" };
        match opponent_name {
            Some(name) => format!("GW{} vs {} ({})", self.gameweek, name, venue),
            None if self.opponent > 0 => {
                format!("GW{} vs #{} ({})", self.gameweek, self.opponent, venue)
            }
            None => format!("GW{}", self.gameweek),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowData {
    /// Records inside the window, ascending by gameweek
    pub records: Vec<StatRecord>,
    pub rows: Vec<GameweekRow>,
}

impl WindowData {
    pub fn total_points(&self) -> i64 {
        self.rows.iter().map(|r| r.points).sum()
    }

    pub fn outliers(&self) -> impl Iterator<Item = &GameweekRow> {
        self.rows.iter().filter(|r| r.outlier)
    }
}

/// Result of cutting a history down to a window.
///
/// `NoData` means no gameweek fell in range, which is not the same thing as
/// a window of zero-point weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WindowReport {
    NoData,
    Data(WindowData),
}

impl WindowReport {
    pub fn is_empty(&self) -> bool {
        matches!(self, WindowReport::NoData)
    }

    pub fn data(&self) -> Option<&WindowData> {
        match self {
            WindowReport::NoData => None,
            WindowReport::Data(data) => Some(data),
        }
    }

    /// Records in range; empty for `NoData`.
    pub fn records(&self) -> &[StatRecord] {
        self.data().map(|d| d.records.as_slice()).unwrap_or(&[])
    }
}

/// Filter to `window` and build per-gameweek rows with high-outlier flags.
pub fn filter_and_aggregate(records: &[StatRecord], window: Window) -> WindowReport {
    filter_and_aggregate_with(records, window, HIGH_OUTLIER_Z)
}

/// [`filter_and_aggregate`] with a custom z-score threshold.
pub fn filter_and_aggregate_with(
    records: &[StatRecord],
    window: Window,
    outlier_z: f64,
) -> WindowReport {
    let mut filtered: Vec<StatRecord> = records
        .iter()
        .filter(|r| window.contains(r.gameweek))
        .copied()
        .collect();

    if filtered.is_empty() {
        tracing::debug!(%window, available = records.len(), "no gameweeks in window");
        return WindowReport::NoData;
    }

    // Stable, so same-gameweek records keep feed order
    filtered.sort_by_key(|r| r.gameweek);

    let points: Vec<i64> = filtered.iter().map(|r| r.total_points as i64).collect();
    let window_total: i64 = points.iter().sum();
    let stats = weekly_stats(&points);
    let flags = high_outliers(&points, &stats, outlier_z);

    let rows = filtered
        .iter()
        .zip(flags)
        .map(|(record, outlier)| {
            let points = record.total_points as i64;
            GameweekRow {
                gameweek: record.gameweek,
                opponent: record.opponent,
                was_home: record.was_home,
                points,
                percent: percent_of(points, window_total),
                z_score: z_score(points, &stats),
                outlier,
            }
        })
        .collect();

    WindowReport::Data(WindowData {
        records: filtered,
        rows,
    })
}
