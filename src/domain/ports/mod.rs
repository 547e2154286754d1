//! Port trait definitions (Hexagonal Architecture)
//!
//! - TaskDataProvider: external source of translation tasks
//! - TaskLookup: resolution of task ids into cached tasks

pub mod task_lookup;
pub mod task_provider;

pub use task_lookup::TaskLookup;
pub use task_provider::TaskDataProvider;
