mod file_store;
mod sessions;
mod store;

pub use file_store::JsonFileStore;
pub use sessions::SessionRepository;
pub use store::{KeyValueStore, MemoryStore};
