//! The spiral curve model.
//!
//! The model is a small set of pure functions so that the objective, the
//! optimisers and the reporting stage all evaluate exactly the same formula.

pub mod model;

pub use model::*;
