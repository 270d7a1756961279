//! # SGraph Config
//!
//! Data source settings and per-query configuration for SGraph.
//!
//! Settings are plain serde structs whose `Default` impls carry the
//! documented defaults, loaded from YAML with environment overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
