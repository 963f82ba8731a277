//! Plot rendering.
//!
//! - PNG scatter + fitted curve (`png`)

pub mod png;

pub use png::*;
