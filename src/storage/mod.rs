pub mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::{SnapshotManager, SnapshotMetadata, StoreSnapshot, SNAPSHOT_FILE_NAME};
