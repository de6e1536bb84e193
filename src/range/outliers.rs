/// Z-score at or above which a gameweek counts as a high outlier.
pub const HIGH_OUTLIER_Z: f64 = 1.5;

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Mean and population standard deviation of weekly points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Population statistics (N denominator): the window is the whole set of
/// weeks being judged, not a sample of them.
pub fn weekly_stats(points: &[i64]) -> WeeklyStats {
    if points.is_empty() {
        return WeeklyStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = points.len() as f64;
    let mean = points.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = points
        .iter()
        .map(|&p| (p as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    WeeklyStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// 0.0 when every week scored the same.
pub fn z_score(value: i64, stats: &WeeklyStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value as f64 - stats.mean) / stats.stdev
}

/// Flags for high-scoring weeks only; low weeks are never flagged.
pub fn high_outliers(points: &[i64], stats: &WeeklyStats, threshold: f64) -> Vec<bool> {
    points
        .iter()
        .map(|&p| stats.stdev >= STDEV_EPSILON && z_score(p, stats) >= threshold)
        .collect()
}
