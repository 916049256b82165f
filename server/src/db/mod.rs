//! Database module for PostgreSQL persistence.

mod books;
mod pool;

pub use books::*;
pub use pool::*;
