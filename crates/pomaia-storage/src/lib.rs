//! Persistent string slots
//!
//! A minimal key/value boundary: values are opaque strings (callers serialize
//! their own documents), a missing key reads as `None`.

pub mod error;
pub mod store;

pub use error::{Result, StorageError};
pub use store::{FileStore, KeyValueStore, MemoryStore};
