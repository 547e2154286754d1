pub mod client;

pub use client::{LinguoClient, Navigation, RequesterOutcome};
