//! PbiLink Library
//!
//! Command-line companion for the pbi-tools Power BI toolkit providing
//! extract/compile/watch dispatch, live-session matching and self-install.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::dispatch::{ActionDispatcher, WatchOutcome};
pub use crate::core::session::find_session;
pub use crate::core::status::{parse_status_output, Session, StatusReport};
pub use crate::domain::config::PbiLinkConfig;
pub use crate::domain::error::{PbiLinkError, PbiLinkResult};
