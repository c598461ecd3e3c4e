//! Data models and structures for the connectivity checker

pub mod config;
pub mod outcome;
pub mod request;

// Re-export main model types
pub use config::Config;
pub use outcome::{OutcomeCategory, OutcomeContext, ProbeOutcome};
pub use request::ProbeRequest;
