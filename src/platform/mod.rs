//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Storage (in-memory for tests and embedding, a JSON file natively)

pub mod storage;

pub use storage::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
