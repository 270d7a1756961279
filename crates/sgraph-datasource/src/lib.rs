//! # SGraph Data Source
//!
//! Host-facing surface of the scrobble data source: the query executor
//! that answers dashboard queries with series tables, and the
//! connectivity probe.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod datasource;
pub mod error;
pub mod health;

pub use datasource::*;
pub use error::*;
pub use health::*;
