use crate::core::session::find_session;
use crate::core::status::StatusSource;
use crate::domain::error::{PbiLinkError, PbiLinkResult};
use crate::infrastructure::process::{LaunchedTool, ToolRunner};
use std::path::Path;
use tracing::info;

/// Fixed output format passed to `compile`.
const COMPILE_FORMAT: &str = "PBIT";

/// Result of a watch attempt.
#[derive(Debug)]
pub enum WatchOutcome {
    /// A matching session was found and the watch process was launched.
    Attached {
        process_id: u32,
        handle: LaunchedTool,
    },
    /// The file is not open in the external application. Expected outcome,
    /// not an error.
    NotOpen,
}

/// Orchestrates the user-facing actions by invoking the external tool.
///
/// Every launch is fire-and-forget: the tool is started detached and left
/// running. Only the status query (inside `watch`) is awaited.
pub struct ActionDispatcher<S: StatusSource> {
    runner: ToolRunner,
    status: S,
}

impl<S: StatusSource> ActionDispatcher<S> {
    pub fn new(runner: ToolRunner, status: S) -> Self {
        Self { runner, status }
    }

    /// Launch `extract <file>` for an existing `.pbix` file.
    pub fn extract(&self, file: &Path) -> PbiLinkResult<LaunchedTool> {
        if !file.exists() {
            return Err(PbiLinkError::PathNotFound {
                path: file.to_path_buf(),
            });
        }
        let file_arg = file.to_string_lossy();
        let handle = self.runner.launch_detached(&["extract", &*file_arg])?;
        info!(file = %file.display(), pid = ?handle.id(), "extract launched");
        Ok(handle)
    }

    /// Launch `compile <folder> -format PBIT -overwrite` for an existing
    /// source folder.
    pub fn compile(&self, folder: &Path) -> PbiLinkResult<LaunchedTool> {
        if !folder.is_dir() {
            return Err(PbiLinkError::PathNotFound {
                path: folder.to_path_buf(),
            });
        }
        let folder_arg = folder.to_string_lossy();
        let handle = self.runner.launch_detached(&[
            "compile",
            &*folder_arg,
            "-format",
            COMPILE_FORMAT,
            "-overwrite",
        ])?;
        info!(folder = %folder.display(), pid = ?handle.id(), "compile launched");
        Ok(handle)
    }

    /// Attach a continuous watch to the running session that has `file` open.
    ///
    /// Queries the tool's status report, matches `file` against the reported
    /// sessions and, on a match, launches `extract -pid <id> -watch` against
    /// the session's process. [`WatchOutcome::NotOpen`] is returned when no
    /// session has the file open.
    pub async fn watch(&self, file: &Path) -> PbiLinkResult<WatchOutcome> {
        let report = self.status.status_report().await?;

        let Some(session) = find_session(file, &report)? else {
            info!(file = %file.display(), "no live session for file");
            return Ok(WatchOutcome::NotOpen);
        };

        let process_id = session.process_id;
        let pid_arg = process_id.to_string();
        let handle = self
            .runner
            .launch_detached(&["extract", "-pid", pid_arg.as_str(), "-watch"])?;
        info!(file = %file.display(), session_pid = process_id, "watch attached");

        Ok(WatchOutcome::Attached { process_id, handle })
    }
}
