use serde::Serialize;

use super::engine::{percent_of, CategoryBreakdown, CategoryLine};
use super::rules::Category;

/// Reconstructed total against the provider's total.
///
/// `computed_total + residual == authoritative_total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub computed_total: i64,
    pub authoritative_total: i64,
    pub residual: i64,
}

pub fn reconcile(computed_total: i64, authoritative_total: i64) -> Reconciliation {
    Reconciliation {
        computed_total,
        authoritative_total,
        residual: authoritative_total - computed_total,
    }
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        self.residual == 0
    }

    /// Append an `Unattributed` line carrying the residual, if there is one.
    pub fn apply(&self, breakdown: &mut CategoryBreakdown) {
        if self.is_balanced() {
            return;
        }

        tracing::debug!(
            residual = self.residual,
            computed_total = self.computed_total,
            authoritative_total = self.authoritative_total,
            "rule table drifted from provider total"
        );

        breakdown.lines.push(CategoryLine {
            category: Category::Unattributed,
            points: self.residual,
            count: 0,
            percent: percent_of(self.residual, self.authoritative_total),
        });
    }
}
