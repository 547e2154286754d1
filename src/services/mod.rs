pub mod event_bus;
pub mod event_factory;
pub mod requester_service;
pub mod task_cache;
pub mod tasks_worker;

pub use event_bus::{
    EventBus, EventBusConfig, EventCategory, EventId, EventPayload, EventSeverity, SequenceNumber,
    UnifiedEvent,
};
pub use requester_service::{
    RequesterConfig, RequesterService, NO_REQUESTS_MESSAGE, TRANSLATION_REQUEST_ROUTE,
};
pub use task_cache::TaskCache;
pub use tasks_worker::TasksWorker;
