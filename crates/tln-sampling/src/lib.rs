//! # tln-sampling
//!
//! Combinatorial sampling for the tlnull workspace:
//! - uniform random weak compositions (cut-point method),
//! - exact uniform random integer partitions (count-table method),
//! - the deadline-bounded per-(Q, N) variance sampling engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod composition;
pub mod partition;
pub mod variance;

pub use composition::{distinct_compositions, random_weak_composition};
pub use partition::{CountTable, CountTableSampler};
pub use variance::{sample_variance, variances_for_qn};
