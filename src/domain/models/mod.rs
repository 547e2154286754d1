pub mod account;
pub mod config;
pub mod correlation;
pub mod language_pairing;
pub mod slot;
pub mod task;

pub use account::AccountKey;
pub use config::{
    Config, EventBusSettings, LanguageGroupConfig, LanguagesConfig, LoggingConfig, ReconcilerConfig,
};
pub use correlation::{CorrelationKey, INTERNAL_FETCH_KEY};
pub use language_pairing::LanguagePairing;
pub use slot::{FetchSlot, LoadingState, RequesterState};
pub use task::{Task, TaskId, TaskParty, TaskStatus};
