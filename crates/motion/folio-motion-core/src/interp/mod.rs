//! Interpolation helpers.
//!
//! Floats and colors blend component-wise; text is step-only.

pub mod functions;

pub use functions::{interpolate, lerp_color, lerp_f32, sample};
