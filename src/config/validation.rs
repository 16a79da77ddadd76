use crate::error::AppError;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Base URL cannot be empty and must start with http:// or https://
/// - HTTP timeout must be positive
/// - If a log file path is provided, it cannot be empty
pub fn validate_config(
    base_url: &str,
    http_timeout_seconds: u64,
    log_file_path: &Option<String>,
) -> Result<(), AppError> {
    if base_url.is_empty() {
        return Err(AppError::config_error("Base URL cannot be empty"));
    }

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(AppError::config_error(format!(
            "Base URL must start with http:// or https://, got '{base_url}'"
        )));
    }

    if http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least one second",
        ));
    }

    if let Some(log_path) = log_file_path
        && log_path.trim().is_empty()
    {
        return Err(AppError::config_error("Log file path cannot be empty"));
    }

    Ok(())
}
