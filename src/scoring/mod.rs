pub mod engine;
pub mod error;
pub mod reconcile;
pub mod rules;

pub use engine::{
    authoritative_total, compute_breakdown, percent_of, score_player, score_records,
    CategoryBreakdown, CategoryLine, ScoreResult,
};
pub use error::ScoringError;
pub use reconcile::{reconcile, Reconciliation};
pub use rules::{eligible_categories, rule_for, Category, Rule};
