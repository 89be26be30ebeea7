use crate::core::status::report::{parse_status_output, StatusReport};
use crate::domain::error::PbiLinkResult;
use crate::infrastructure::process::ToolRunner;
use async_trait::async_trait;
use tracing::debug;

/// Status query argument understood by the external tool.
const STATUS_ARG: &str = "info";

/// Source of status reports.
///
/// The dispatcher talks to this trait so the watch flow can be exercised
/// against canned reports in tests.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Run the status query and return the parsed report.
    async fn status_report(&self) -> PbiLinkResult<StatusReport>;
}

/// Status source backed by the real external tool.
pub struct ToolStatusSource {
    runner: ToolRunner,
}

impl ToolStatusSource {
    pub fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl StatusSource for ToolStatusSource {
    async fn status_report(&self) -> PbiLinkResult<StatusReport> {
        let output = self.runner.run_capture(&[STATUS_ARG]).await?;
        let report = parse_status_output(&output)?;
        debug!(sessions = report.sessions.len(), "status query complete");
        Ok(report)
    }
}
