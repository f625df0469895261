//! Platform-independent simulation core for the portfolio effects engine.
//!
//! Nothing here touches the browser or the GPU. The web front-end feeds
//! pointer samples and frame ticks in and draws what comes out.

pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod easing;
pub mod echo;
pub mod error;
pub mod fluid;
pub mod gallery;
pub mod lifecycle;
pub mod pointer;
pub mod regions;
pub mod scroll;
pub mod trail;
pub mod trigger;
pub mod wave_grid;

pub use config::{parse as parse_config, Validate};
pub use error::{ConfigError, ConfigResult};
pub use lifecycle::Lifecycle;
pub use pointer::{PointerSample, PointerState};
