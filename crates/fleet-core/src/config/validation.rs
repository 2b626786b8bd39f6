//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_exec(config)?;
    validate_sources(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_exec(config: &Config) -> Result<()> {
    if config.exec.command.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "exec.command".to_string(),
            message: "command cannot be empty".to_string(),
        }
        .into());
    }

    if config.exec.progress_delay_ms == 0 {
        return Err(ConfigError::InvalidValue {
            field: "exec.progress_delay_ms".to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_sources(config: &Config) -> Result<()> {
    if config.sources.make.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "sources.make".to_string(),
            message: "make program cannot be empty".to_string(),
        }
        .into());
    }

    if config.sources.files.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "sources.files".to_string(),
            message: "at least one source file is required".to_string(),
        }
        .into());
    }

    for (i, source) in config.sources.files.iter().enumerate() {
        if source.file.is_empty() || source.target.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("sources.files[{}]", i),
                message: "file and target cannot be empty".to_string(),
            }
            .into());
        }
    }

    Ok(())
}
