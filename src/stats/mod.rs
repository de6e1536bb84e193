pub mod feed;
pub mod types;
pub mod validation;

pub use feed::{load_snapshot, PlayerEntry, SeasonSnapshot, TeamEntry};
pub use types::{Position, StatRecord};
pub use validation::validate_records;
