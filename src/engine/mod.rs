//! Pure computation engine for window point calculation.
//!
//! Nothing in here performs I/O; every function is deterministic in its
//! inputs.

pub mod aggregator;
pub mod integrator;

pub use aggregator::{aggregate, user_points};
pub use integrator::integrate;
