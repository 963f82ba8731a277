//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - define the L1 objective over observations (`objective`)
//! - search the parameter box globally with differential evolution (`global`)
//! - polish the global optimum with Nelder–Mead (`local`)
//! - chain both stages and report progress (`driver`)

pub mod driver;
pub mod global;
pub mod local;
pub mod objective;

pub use driver::*;
pub use global::*;
pub use local::*;
pub use objective::*;
