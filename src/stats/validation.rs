use std::collections::HashSet;

use super::types::StatRecord;

/// Longest a single match can run, extra time included.
pub const MAX_MATCH_MINUTES: u32 = 120;

/// Check a player's history for problems the engine tolerates but a caller
/// should hear about. Returns all findings at once (not just the first).
pub fn validate_records(records: &[StatRecord]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, record) in records.iter().enumerate() {
        if record.gameweek == 0 {
            errors.push(format!("history[{}].round: gameweek must be positive", i));
        } else if !seen.insert(record.gameweek) {
            errors.push(format!(
                "history[{}].round: duplicate gameweek {}",
                i, record.gameweek
            ));
        }

        if record.minutes > MAX_MATCH_MINUTES {
            errors.push(format!(
                "history[{}].minutes: {} exceeds {}",
                i, record.minutes, MAX_MATCH_MINUTES
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
