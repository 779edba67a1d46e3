//! SQLite persistence layer.

pub mod pool;
pub mod session;
pub mod token;
