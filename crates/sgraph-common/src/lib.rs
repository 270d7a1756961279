//! # SGraph Common
//!
//! Shared error types, logging setup and domain newtypes for the SGraph
//! scrobble data source.
//!
//! This crate provides the foundational types used across all other crates
//! in the SGraph workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{Result, SGraphError};
pub use logging::{
    init_default_logging, init_dev_logging, init_host_logging, init_logging, LoggingConfig,
};
pub use types::*;
