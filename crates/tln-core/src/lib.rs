//! # tln-core
//!
//! Core types for the tlnull workspace: the shared error type, the data
//! model of the analysis pipeline (QN records, comparison records), and the
//! trait seam for the external partition-sampling capability.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
