//! Reconstruct a fantasy-football player's points by scoring category.
//!
//! The engine is a set of pure functions over per-gameweek [`stats::StatRecord`]s:
//! [`range::filter_and_aggregate`] cuts a history to a gameweek window,
//! [`scoring::score_records`] applies the position's rule table and reconciles
//! against the provider's total, and [`compare::compare`] lines two players up.

pub mod compare;
pub mod config;
pub mod output;
pub mod range;
pub mod scoring;
pub mod stats;
pub mod value;
