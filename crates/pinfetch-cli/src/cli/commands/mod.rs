//! CLI command handlers, one per file.

mod extract;
mod fetch;
mod resolve;
mod sniff;

pub use extract::run_extract;
pub use fetch::run_fetch;
pub use resolve::run_resolve;
pub use sniff::run_sniff;
