//! CLI command handlers, one per file.

mod cache_path;
mod load;
mod lock;
mod resolve;

pub use cache_path::run_cache_path;
pub use load::run_load;
pub use lock::run_lock;
pub use resolve::run_resolve;

#[cfg(test)]
pub(crate) use lock::lock_rows;
