//! CLI command implementations

pub mod check;
pub mod presets;
pub mod run;
