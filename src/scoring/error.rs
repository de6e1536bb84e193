use thiserror::Error;

/// Errors that stop a scoring computation.
///
/// Everything else (missing fields, empty windows, zero totals) is
/// normalized to a benign default inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("invalid position '{0}': expected GK, DEF, MID or FWD")]
    InvalidPosition(String),
}
