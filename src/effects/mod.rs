pub mod count_up;
pub mod cursor_trail;
pub mod fluid_overlay;
pub mod gallery;
pub mod hero;
pub mod invert_cursor;
pub mod magnetic;
pub mod scroll;
pub mod wave_grid;

use crate::core::{parse_config, ConfigError, Validate};
use serde::de::DeserializeOwned;

/// Parse an optional JSON config and log what was rejected.
pub(crate) fn load_config<T>(tag: &str, json: Option<&str>) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default + Validate,
{
    parse_config::<T>(json).map_err(|e: ConfigError| {
        log::warn!("[{}] config rejected: {}", tag, e);
        anyhow::Error::new(e)
    })
}
