use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref window) = config.window {
        if window.start == Some(0) {
            errors.push("window.start: gameweeks start at 1".to_string());
        }
        if window.end == Some(0) {
            errors.push("window.end: gameweeks start at 1".to_string());
        }
        if let (Some(start), Some(end)) = (window.start, window.end) {
            if start > end {
                errors.push(format!(
                    "window: start ({}) is after end ({})",
                    start, end
                ));
            }
        }
    }

    if let Some(z) = config.outlier_z {
        if !z.is_finite() || z <= 0.0 {
            errors.push(format!("outlier_z: must be a positive number, got {}", z));
        }
    }

    if let Some(ref data) = config.data {
        if data.as_os_str().is_empty() {
            errors.push("data: path is empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
