pub use fx_core::*;

// Shaders bundled as string constants
pub static FLUID_WGSL: &str = include_str!("../../shaders/fluid.wgsl");
pub static NOISE_FIELD_WGSL: &str = include_str!("../../shaders/noise_field.wgsl");
pub static GALLERY_WGSL: &str = include_str!("../../shaders/gallery.wgsl");
