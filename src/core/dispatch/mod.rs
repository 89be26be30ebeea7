// Dispatch module - User-facing action orchestration
pub mod dispatcher;

pub use dispatcher::{ActionDispatcher, WatchOutcome};
