//! CLI command implementations.

pub mod analyze;
pub mod presets;
pub mod validate;
