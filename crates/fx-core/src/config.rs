//! JSON configuration shared by every effect.
//!
//! Hosts pass an optional JSON object; missing fields fall back to the
//! documented defaults through `#[serde(default)]` on each config type.

use crate::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;

/// Range checks run after deserialization.
pub trait Validate {
    fn validate(&self) -> ConfigResult<()>;
}

/// Parse an optional JSON config, falling back to `T::default()` when the
/// host passed nothing (or only whitespace).
pub fn parse<T>(json: Option<&str>) -> ConfigResult<T>
where
    T: DeserializeOwned + Default + Validate,
{
    let cfg = match json.map(str::trim) {
        None | Some("") => T::default(),
        Some(raw) => serde_json::from_str(raw)?,
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Lerp factors must lie in (0, 1]; zero would freeze the follower and
/// anything above one overshoots.
pub(crate) fn check_factor(field: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "in (0, 1]",
        })
    }
}

/// Damping and dissipation must stay strictly below one so energy decays.
pub(crate) fn check_decay(field: &'static str, value: f32) -> ConfigResult<()> {
    if value >= 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "in [0, 1)",
        })
    }
}

pub(crate) fn check_positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "finite and > 0",
        })
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "finite and >= 0",
        })
    }
}

pub(crate) fn check_count(field: &'static str, value: usize, min: usize) -> ConfigResult<()> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            expected: "at least the minimum count",
        })
    }
}
