use serde::Serialize;

use super::error::ScoringError;
use super::reconcile::{reconcile, Reconciliation};
use super::rules::{eligible_categories, rule_for, Category};
use crate::stats::{Position, StatRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub category: Category,
    pub points: i64,
    pub count: i64,   // Raw events behind the points, e.g. saves made
    pub percent: f64, // Share of the authoritative total, one decimal
}

/// Points per category for one player over a run of gameweeks.
///
/// Only categories eligible for `position` appear, plus an `Unattributed`
/// line once a reconciliation has been applied with a non-zero residual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub position: Position,
    pub lines: Vec<CategoryLine>,
}

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> Option<&CategoryLine> {
        self.lines.iter().find(|l| l.category == category)
    }

    /// Points in a category, 0 when the category is absent.
    pub fn points(&self, category: Category) -> i64 {
        self.get(category).map(|l| l.points).unwrap_or(0)
    }

    /// Sum of every displayed line.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(|l| l.points).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.lines.iter().map(|l| l.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub breakdown: CategoryBreakdown,
    pub reconciliation: Reconciliation,
}

/// Share of `total` as a percentage rounded to one decimal; 0 when `total` is 0.
pub fn percent_of(points: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (points as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Sum of the provider's own per-gameweek totals.
pub fn authoritative_total(records: &[StatRecord]) -> i64 {
    records.iter().map(|r| r.total_points as i64).sum()
}

/// Apply the rule table to every record and sum per category.
///
/// Each rule is evaluated match by match and then summed, so per-match caps
/// and floor divisions never leak across gameweeks. Returns the breakdown and
/// the reconstructed total. An empty slice gives every eligible category at 0.
pub fn compute_breakdown(records: &[StatRecord], position: Position) -> (CategoryBreakdown, i64) {
    let total = authoritative_total(records);

    let lines: Vec<CategoryLine> = eligible_categories(position)
        .iter()
        .filter_map(|&category| {
            let rule = rule_for(category, position)?;
            let (points, count) = records.iter().fold((0i64, 0i64), |(points, count), record| {
                let raw = category.raw(record);
                (points + rule.points(record, raw), count + raw)
            });
            Some(CategoryLine {
                category,
                points,
                count,
                percent: percent_of(points, total),
            })
        })
        .collect();

    let computed_total: i64 = lines.iter().map(|l| l.points).sum();

    tracing::debug!(
        %position,
        records = records.len(),
        computed_total,
        authoritative_total = total,
        "computed category breakdown"
    );

    (CategoryBreakdown { position, lines }, computed_total)
}

/// Breakdown plus reconciliation: the displayed lines always sum to the
/// provider's total.
pub fn score_records(records: &[StatRecord], position: Position) -> ScoreResult {
    let (mut breakdown, computed_total) = compute_breakdown(records, position);
    let reconciliation = reconcile(computed_total, authoritative_total(records));
    reconciliation.apply(&mut breakdown);

    ScoreResult {
        breakdown,
        reconciliation,
    }
}

/// Like [`score_records`], for callers holding a raw position code ("DEF", "fwd", ...).
pub fn score_player(records: &[StatRecord], position: &str) -> Result<ScoreResult, ScoringError> {
    let position: Position = position.parse()?;
    Ok(score_records(records, position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn played(gameweek: u32, minutes: u32, total_points: i32) -> StatRecord {
        StatRecord {
            minutes,
            total_points,
            ..StatRecord::for_gameweek(gameweek)
        }
    }

    #[test]
    fn test_empty_input_all_zero() {
        for position in Position::ALL {
            let (breakdown, computed) = compute_breakdown(&[], position);
            assert_eq!(computed, 0);
            assert_eq!(breakdown.lines.len(), eligible_categories(position).len());
            assert!(breakdown
                .lines
                .iter()
                .all(|l| l.points == 0 && l.count == 0 && l.percent == 0.0));
        }
    }

    #[test]
    fn test_goal_points_by_position() {
        let record = StatRecord {
            goals_scored: 1,
            ..played(1, 90, 0)
        };

        let (gk, _) = compute_breakdown(&[record], Position::Goalkeeper);
        let (def, _) = compute_breakdown(&[record], Position::Defender);
        let (mid, _) = compute_breakdown(&[record], Position::Midfielder);
        let (fwd, _) = compute_breakdown(&[record], Position::Forward);

        assert_eq!(gk.points(Category::Goals), 10);
        assert_eq!(def.points(Category::Goals), 6);
        assert_eq!(mid.points(Category::Goals), 5);
        assert_eq!(fwd.points(Category::Goals), 4);
        assert_eq!(fwd.get(Category::Goals).unwrap().count, 1);
    }

    #[test]
    fn test_forward_never_has_saves() {
        let record = StatRecord {
            saves: 9,
            penalties_saved: 1,
            ..played(1, 90, 2)
        };
        let (breakdown, _) = compute_breakdown(&[record], Position::Forward);
        assert!(breakdown.get(Category::Saves).is_none());
        assert!(breakdown.get(Category::PenaltiesSaved).is_none());
        assert!(breakdown.get(Category::CleanSheets).is_none());
        assert!(breakdown.get(Category::GoalsConceded).is_none());
    }

    #[test]
    fn test_only_eligible_categories() {
        let record = StatRecord {
            goals_scored: 1,
            saves: 4,
            goals_conceded: 3,
            defensive_contribution: 14,
            ..played(1, 90, 10)
        };
        for position in Position::ALL {
            let (breakdown, _) = compute_breakdown(&[record], position);
            let categories: Vec<Category> = breakdown.categories().collect();
            assert_eq!(categories, eligible_categories(position));
        }
    }

    #[test]
    fn test_defensive_contribution_capped_per_match() {
        let record = StatRecord {
            defensive_contribution: 25,
            ..played(1, 90, 4)
        };
        let (breakdown, _) = compute_breakdown(&[record], Position::Defender);
        assert_eq!(breakdown.points(Category::DefensiveContribution), 2);
        assert_eq!(breakdown.get(Category::DefensiveContribution).unwrap().count, 25);
    }

    #[test]
    fn test_defensive_contribution_not_summed_first() {
        // 8 + 8 crosses 10 only when summed; neither match qualifies on its own.
        let records = vec![
            StatRecord {
                defensive_contribution: 8,
                ..played(1, 90, 2)
            },
            StatRecord {
                defensive_contribution: 8,
                ..played(2, 90, 2)
            },
            StatRecord {
                defensive_contribution: 10,
                ..played(3, 90, 4)
            },
        ];
        let (breakdown, _) = compute_breakdown(&records, Position::Defender);
        assert_eq!(breakdown.points(Category::DefensiveContribution), 2);
    }

    #[test]
    fn test_goals_conceded_per_match() {
        // 1 + 1 would be -1 if accumulated over the range; per match it is 0.
        let records = vec![
            StatRecord {
                goals_conceded: 1,
                ..played(1, 90, 2)
            },
            StatRecord {
                goals_conceded: 1,
                ..played(2, 90, 2)
            },
            StatRecord {
                goals_conceded: 4,
                ..played(3, 90, 0)
            },
        ];
        let (breakdown, _) = compute_breakdown(&records, Position::Goalkeeper);
        assert_eq!(breakdown.points(Category::GoalsConceded), -2);
        assert_eq!(breakdown.get(Category::GoalsConceded).unwrap().count, 6);
    }

    #[test]
    fn test_goals_conceded_ignores_minutes() {
        // Clean sheets need 60 minutes; conceded goals count from the first minute.
        let records = vec![
            StatRecord {
                goals_conceded: 2,
                ..played(1, 30, 0)
            },
            StatRecord {
                clean_sheets: 1,
                ..played(2, 30, 1)
            },
        ];
        let (breakdown, _) = compute_breakdown(&records, Position::Defender);
        assert_eq!(breakdown.points(Category::GoalsConceded), -1);
        assert_eq!(breakdown.points(Category::CleanSheets), 0);
        assert_eq!(breakdown.points(Category::Minutes), 2);
    }

    #[test]
    fn test_clean_sheet_values() {
        let record = StatRecord {
            clean_sheets: 1,
            ..played(1, 90, 6)
        };
        let (gk, _) = compute_breakdown(&[record], Position::Goalkeeper);
        let (mid, _) = compute_breakdown(&[record], Position::Midfielder);
        assert_eq!(gk.points(Category::CleanSheets), 4);
        assert_eq!(mid.points(Category::CleanSheets), 1);

        let cameo = StatRecord {
            clean_sheets: 1,
            ..played(2, 30, 1)
        };
        let (def, _) = compute_breakdown(&[cameo], Position::Defender);
        assert_eq!(def.points(Category::CleanSheets), 0);
    }

    #[test]
    fn test_goalkeeper_full_match() {
        // 90 mins (2), clean sheet (4), 7 saves (2), pen save (5), bonus 3 => 16
        let record = StatRecord {
            clean_sheets: 1,
            saves: 7,
            penalties_saved: 1,
            bonus: 3,
            ..played(1, 90, 16)
        };
        let (breakdown, computed) = compute_breakdown(&[record], Position::Goalkeeper);
        assert_eq!(computed, 16);
        assert_eq!(breakdown.points(Category::Saves), 2);
        assert_eq!(breakdown.points(Category::PenaltiesSaved), 5);
        assert_eq!(breakdown.points(Category::Bonus), 3);
        assert_eq!(breakdown.get(Category::Minutes).unwrap().percent, 12.5);
        assert_eq!(breakdown.get(Category::CleanSheets).unwrap().percent, 25.0);
    }

    #[test]
    fn test_negative_categories() {
        let record = StatRecord {
            yellow_cards: 1,
            red_cards: 1,
            own_goals: 1,
            penalties_missed: 1,
            ..played(1, 45, -7)
        };
        let (breakdown, computed) = compute_breakdown(&[record], Position::Midfielder);
        assert_eq!(breakdown.points(Category::YellowCards), -1);
        assert_eq!(breakdown.points(Category::RedCards), -3);
        assert_eq!(breakdown.points(Category::OwnGoals), -2);
        assert_eq!(breakdown.points(Category::PenaltiesMissed), -2);
        assert_eq!(computed, 1 - 1 - 3 - 2 - 2);
    }

    #[test]
    fn test_percent_zero_total() {
        let record = StatRecord {
            goals_scored: 1,
            ..played(1, 90, 0)
        };
        let (breakdown, _) = compute_breakdown(&[record], Position::Forward);
        assert!(breakdown.lines.iter().all(|l| l.percent == 0.0));
    }

    #[test]
    fn test_percent_of_rounding() {
        assert_eq!(percent_of(1, 3), 33.3);
        assert_eq!(percent_of(2, 3), 66.7);
        assert_eq!(percent_of(5, 0), 0.0);
        assert_eq!(percent_of(-2, 8), -25.0);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![
            StatRecord {
                goals_scored: 2,
                assists: 1,
                bonus: 3,
                ..played(1, 90, 15)
            },
            played(2, 20, 1),
        ];
        let first = score_records(&records, Position::Midfielder);
        let second = score_records(&records, Position::Midfielder);
        assert_eq!(first, second);
    }

    #[test]
    fn test_score_records_balances() {
        // Provider awarded 3 more than the rule table knows about.
        let record = StatRecord {
            goals_scored: 1,
            ..played(1, 90, 9)
        };
        let result = score_records(&[record], Position::Forward);
        assert_eq!(result.reconciliation.computed_total, 6);
        assert_eq!(result.reconciliation.residual, 3);
        assert_eq!(result.breakdown.points(Category::Unattributed), 3);
        assert_eq!(result.breakdown.total(), 9);
    }

    #[test]
    fn test_score_records_empty() {
        let result = score_records(&[], Position::Defender);
        assert_eq!(result.reconciliation.computed_total, 0);
        assert_eq!(result.reconciliation.authoritative_total, 0);
        assert_eq!(result.reconciliation.residual, 0);
        assert!(result.breakdown.get(Category::Unattributed).is_none());
    }

    #[test]
    fn test_score_player_invalid_position() {
        let err = score_player(&[played(1, 90, 2)], "WINGER").unwrap_err();
        assert_eq!(err, ScoringError::InvalidPosition("WINGER".to_string()));
    }

    #[test]
    fn test_score_player_valid_position() {
        let result = score_player(&[played(1, 90, 2)], "fwd").unwrap();
        assert_eq!(result.breakdown.position, Position::Forward);
        assert_eq!(result.reconciliation.residual, 0);
    }
}
