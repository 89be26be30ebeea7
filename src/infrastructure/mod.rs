// Infrastructure module - External dependencies and adapters
pub mod config;
pub mod install;
pub mod logging;
pub mod process;
