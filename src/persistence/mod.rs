//! Durable storage for state that must survive restarts.

mod fsync;
mod kv;

pub use kv::{FileKvStore, KvError, PersistentKeyValueStore};
