//! Storage module
//!
//! Storage file handles that tables are registered with.

pub mod heap;

pub use heap::{DbFile, HeapFile};
