//! Task data provider adapters.

pub mod file_provider;
pub mod memory_provider;

pub use file_provider::FileTaskProvider;
pub use memory_provider::InMemoryTaskProvider;
