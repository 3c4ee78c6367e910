use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Concurrency cap is not 0
/// - Progress buffer is not 0
/// - ffmpeg path is not empty
/// - Success and failure ledgers are distinct files
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "batch.concurrency cannot be 0".to_string(),
        ));
    }

    if config.fetcher.progress_buffer == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.progress_buffer cannot be 0".to_string(),
        ));
    }

    if config.remux.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "remux.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.batch.success_ledger == config.batch.failure_ledger {
        return Err(ConfigError::ValidationError(format!(
            "batch.success_ledger and batch.failure_ledger must differ (both are {})",
            config.batch.success_ledger.display()
        )));
    }

    Ok(())
}
