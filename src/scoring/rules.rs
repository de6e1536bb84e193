use serde::Serialize;
use std::fmt;

use crate::stats::{Position, StatRecord};

/// A scoring category, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Minutes,
    Goals,
    Assists,
    CleanSheets,
    GoalsConceded,
    Saves,
    PenaltiesSaved,
    PenaltiesMissed,
    DefensiveContribution,
    YellowCards,
    RedCards,
    OwnGoals,
    Bonus,
    /// Residual between the provider's total and the reconstructed one.
    Unattributed,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Minutes => "Minutes",
            Category::Goals => "Goals",
            Category::Assists => "Assists",
            Category::CleanSheets => "Clean Sheets",
            Category::GoalsConceded => "Goals Conceded",
            Category::Saves => "Saves",
            Category::PenaltiesSaved => "Penalties Saved",
            Category::PenaltiesMissed => "Penalties Missed",
            Category::DefensiveContribution => "Defensive Contribution",
            Category::YellowCards => "Yellow Cards",
            Category::RedCards => "Red Cards",
            Category::OwnGoals => "Own Goals",
            Category::Bonus => "Bonus",
            Category::Unattributed => "Unattributed",
        }
    }

    /// The raw statistic this category counts in one record.
    pub fn raw(&self, record: &StatRecord) -> i64 {
        let value = match self {
            Category::Minutes => record.minutes,
            Category::Goals => record.goals_scored,
            Category::Assists => record.assists,
            Category::CleanSheets => record.clean_sheets,
            Category::GoalsConceded => record.goals_conceded,
            Category::Saves => record.saves,
            Category::PenaltiesSaved => record.penalties_saved,
            Category::PenaltiesMissed => record.penalties_missed,
            Category::DefensiveContribution => record.defensive_contribution,
            Category::YellowCards => record.yellow_cards,
            Category::RedCards => record.red_cards,
            Category::OwnGoals => record.own_goals,
            Category::Bonus => record.bonus,
            Category::Unattributed => 0,
        };
        value as i64
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a category turns one match's raw count into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `short` points for any appearance under `full_minutes`, `full` at or above it.
    Appearance { short: i64, full: i64, full_minutes: u32 },
    /// Flat points per occurrence.
    PerEvent(i64),
    /// `points` for every complete group of `per` occurrences in one match.
    PerBand { points: i64, per: i64 },
    /// Flat points for a qualifying match, only when the player played `min_minutes`.
    MinutesGated { points: i64, min_minutes: u32 },
    /// `points` once per match when the raw count reaches `threshold`; hard cap above it.
    Threshold { points: i64, threshold: i64 },
}

impl Rule {
    /// Points earned in a single match. `raw` is the category's count for that match.
    pub fn points(&self, record: &StatRecord, raw: i64) -> i64 {
        match *self {
            Rule::Appearance {
                short,
                full,
                full_minutes,
            } => {
                if record.minutes >= full_minutes {
                    full
                } else if record.minutes > 0 {
                    short
                } else {
                    0
                }
            }
            Rule::PerEvent(n) => raw * n,
            Rule::PerBand { points, per } => {
                if per > 0 {
                    (raw / per) * points
                } else {
                    0
                }
            }
            Rule::MinutesGated {
                points,
                min_minutes,
            } => {
                if raw > 0 && record.minutes >= min_minutes {
                    points
                } else {
                    0
                }
            }
            Rule::Threshold { points, threshold } => {
                if raw >= threshold {
                    points
                } else {
                    0
                }
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Appearance {
                short,
                full,
                full_minutes,
            } => write!(f, "{:+} (<{}'), {:+} ({}'+)", short, full_minutes, full, full_minutes),
            Rule::PerEvent(n) => write!(f, "{:+} each", n),
            Rule::PerBand { points, per } => write!(f, "{:+} per {}", points, per),
            Rule::MinutesGated {
                points,
                min_minutes,
            } => write!(f, "{:+} per match ({}'+)", points, min_minutes),
            Rule::Threshold { points, threshold } => {
                write!(f, "{:+} per match at {}+", points, threshold)
            }
        }
    }
}

/// Minutes needed for full appearance points and for a clean sheet to count.
pub const FULL_MATCH_MINUTES: u32 = 60;

const GOALKEEPER: &[Category] = &[
    Category::Minutes,
    Category::Goals,
    Category::Assists,
    Category::CleanSheets,
    Category::GoalsConceded,
    Category::Saves,
    Category::PenaltiesSaved,
    Category::PenaltiesMissed,
    Category::YellowCards,
    Category::RedCards,
    Category::OwnGoals,
    Category::Bonus,
];

const DEFENDER: &[Category] = &[
    Category::Minutes,
    Category::Goals,
    Category::Assists,
    Category::CleanSheets,
    Category::GoalsConceded,
    Category::PenaltiesMissed,
    Category::DefensiveContribution,
    Category::YellowCards,
    Category::RedCards,
    Category::OwnGoals,
    Category::Bonus,
];

const MIDFIELDER: &[Category] = &[
    Category::Minutes,
    Category::Goals,
    Category::Assists,
    Category::CleanSheets,
    Category::PenaltiesMissed,
    Category::DefensiveContribution,
    Category::YellowCards,
    Category::RedCards,
    Category::OwnGoals,
    Category::Bonus,
];

const FORWARD: &[Category] = &[
    Category::Minutes,
    Category::Goals,
    Category::Assists,
    Category::PenaltiesMissed,
    Category::DefensiveContribution,
    Category::YellowCards,
    Category::RedCards,
    Category::OwnGoals,
    Category::Bonus,
];

/// Categories a position can score in, in display order.
pub fn eligible_categories(position: Position) -> &'static [Category] {
    match position {
        Position::Goalkeeper => GOALKEEPER,
        Position::Defender => DEFENDER,
        Position::Midfielder => MIDFIELDER,
        Position::Forward => FORWARD,
    }
}

/// Look up the rule for a category and position. `None` means the category
/// does not exist for that position.
pub fn rule_for(category: Category, position: Position) -> Option<Rule> {
    use Category as C;
    use Position as P;

    let rule = match (category, position) {
        (C::Minutes, _) => Rule::Appearance {
            short: 1,
            full: 2,
            full_minutes: FULL_MATCH_MINUTES,
        },
        (C::Goals, P::Goalkeeper) => Rule::PerEvent(10),
        (C::Goals, P::Defender) => Rule::PerEvent(6),
        (C::Goals, P::Midfielder) => Rule::PerEvent(5),
        (C::Goals, P::Forward) => Rule::PerEvent(4),
        (C::Assists, _) => Rule::PerEvent(3),
        (C::CleanSheets, P::Goalkeeper | P::Defender) => Rule::MinutesGated {
            points: 4,
            min_minutes: FULL_MATCH_MINUTES,
        },
        (C::CleanSheets, P::Midfielder) => Rule::MinutesGated {
            points: 1,
            min_minutes: FULL_MATCH_MINUTES,
        },
        (C::GoalsConceded, P::Goalkeeper | P::Defender) => Rule::PerBand { points: -1, per: 2 },
        (C::Saves, P::Goalkeeper) => Rule::PerBand { points: 1, per: 3 },
        (C::PenaltiesSaved, P::Goalkeeper) => Rule::PerEvent(5),
        (C::PenaltiesMissed, _) => Rule::PerEvent(-2),
        (C::DefensiveContribution, P::Defender) => Rule::Threshold {
            points: 2,
            threshold: 10,
        },
        (C::DefensiveContribution, P::Midfielder | P::Forward) => Rule::Threshold {
            points: 2,
            threshold: 12,
        },
        (C::YellowCards, _) => Rule::PerEvent(-1),
        (C::RedCards, _) => Rule::PerEvent(-3),
        (C::OwnGoals, _) => Rule::PerEvent(-2),
        (C::Bonus, _) => Rule::PerEvent(1),
        _ => return None,
    };
    Some(rule)
}
