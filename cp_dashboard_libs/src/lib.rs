pub mod aggregator;
pub mod api;
pub mod cache;
pub mod clients;
pub mod contests;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod query;

pub use error::{FetchError, Result};
pub use query::{ContestQuery, ContestWindow, ProblemQuery};
