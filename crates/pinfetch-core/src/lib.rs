pub mod config;
pub mod logging;

pub mod archive;
pub mod ci;
pub mod error;
pub mod fetch;
pub mod http;
pub mod pipeline;
pub mod revision;
pub mod token;

pub use error::FetchError;
pub use pipeline::{FetchReport, Pipeline};
