//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - residual table export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
