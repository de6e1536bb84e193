pub mod aggregator;
pub mod outliers;

pub use aggregator::{
    filter_and_aggregate, filter_and_aggregate_with, GameweekRow, Window, WindowData,
    WindowReport,
};
pub use outliers::{high_outliers, weekly_stats, z_score, WeeklyStats, HIGH_OUTLIER_Z};
