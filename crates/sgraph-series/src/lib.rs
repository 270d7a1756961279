//! # SGraph Series
//!
//! Retrieval of a user's recent plays from a scrobble API and their
//! conversion into daily play-count time series.
//!
//! Every query mode answers with a [`SeriesTable`]: a `Time` column of
//! epoch-millisecond instants and one number column.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod constant;
pub mod daily_play_count;
pub mod data_fetcher;
pub mod play_event;
pub mod traits;
pub mod types;

pub use constant::*;
pub use daily_play_count::*;
pub use data_fetcher::*;
pub use play_event::*;
pub use traits::*;
pub use types::*;
