use serde::Serialize;
use std::collections::BTreeSet;

use crate::scoring::{Category, CategoryBreakdown, CategoryLine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub category: Category,
    /// `None` when the category does not apply to that player's position
    pub left: Option<CategoryLine>,
    pub right: Option<CategoryLine>,
    /// Strictly greater points wins; ties have no winner. Display only.
    pub winner: Option<Side>,
}

impl ComparisonRow {
    pub fn left_points(&self) -> i64 {
        self.left.as_ref().map(|l| l.points).unwrap_or(0)
    }

    pub fn right_points(&self) -> i64 {
        self.right.as_ref().map(|l| l.points).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn wins(&self, side: Side) -> usize {
        self.rows.iter().filter(|r| r.winner == Some(side)).count()
    }
}

/// Join two breakdowns category by category.
///
/// Categories are unioned, so players in different positions still line up;
/// a category missing on one side counts as zero for picking the winner.
pub fn compare(left: &CategoryBreakdown, right: &CategoryBreakdown) -> Comparison {
    let categories: BTreeSet<Category> = left.categories().chain(right.categories()).collect();

    let rows = categories
        .into_iter()
        .map(|category| {
            let l = left.get(category).cloned();
            let r = right.get(category).cloned();
            let (lp, rp) = (left.points(category), right.points(category));
            let winner = if lp > rp {
                Some(Side::Left)
            } else if rp > lp {
                Some(Side::Right)
            } else {
                None
            };
            ComparisonRow {
                category,
                left: l,
                right: r,
                winner,
            }
        })
        .collect();

    Comparison { rows }
}
