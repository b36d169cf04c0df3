//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_defaults(config)?;
    validate_watch(config)?;
    Ok(())
}

/// Validate default settings.
fn validate_defaults(config: &Config) -> Result<()> {
    let defaults = &config.defaults;

    validate_spacing(defaults.standard_spacing)?;
    validate_latitude(defaults.reference_latitude)?;

    if defaults.formats.is_empty() {
        return Err(Error::ConfigValidation {
            message: "formats must list at least one output format".to_string(),
        });
    }

    Ok(())
}

/// Validate watch settings.
fn validate_watch(config: &Config) -> Result<()> {
    if config.watch.poll_interval_ms == 0 {
        return Err(Error::ConfigValidation {
            message: "poll_interval_ms must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Check that a standard spacing is positive and finite.
pub fn validate_spacing(value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidSpacing { value })
    }
}

/// Check that a latitude lies within -90..=90.
pub fn validate_latitude(value: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidLatitude { value })
    }
}
