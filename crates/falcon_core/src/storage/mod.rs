pub mod kv;
pub mod snapshot;
pub mod wire;

pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use snapshot::{FileSnapshot, NoSnapshot, Snapshot, SnapshotSource};
