mod error;
mod history;
mod memory;
mod traits;


pub use error::{StorageError, StorageResult};
pub use history::History;
pub use memory::InMemoryStore;
pub use traits::ConfigStorage;
