pub mod config;
pub mod parse;
pub mod resolve;
pub mod taxonomy;

pub use parse::run_parse;
pub use resolve::run_resolve;
