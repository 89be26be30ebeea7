use crate::domain::error::{PbiLinkError, PbiLinkResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::debug;

/// Runner for the external `pbi-tools` binary.
///
/// Two invocation modes exist: `run_capture` awaits completion and returns
/// the captured stdout (used only for the status query and the install
/// probe), while `launch_detached` starts the tool and leaves it running.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    binary: String,
    timeout: Duration,
}

/// Handle to a detached tool process. The process keeps running when the
/// handle is dropped; the handle exists so callers can read the pid or
/// cancel later.
#[derive(Debug)]
pub struct LaunchedTool {
    child: Child,
}

impl LaunchedTool {
    /// OS process id, if the process is still running.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Terminate the detached process.
    pub async fn kill(&mut self) -> PbiLinkResult<()> {
        self.child.kill().await?;
        Ok(())
    }
}

impl ToolRunner {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run the tool with `args`, await completion and return its stdout.
    ///
    /// A spawn failure of kind `NotFound` maps to [`PbiLinkError::ToolMissing`]
    /// so install probing can tell "not installed" apart from other failures.
    /// Non-zero exits map to [`PbiLinkError::ToolInvocation`].
    pub async fn run_capture(&self, args: &[&str]) -> PbiLinkResult<String> {
        debug!(binary = %self.binary, ?args, "running tool (captured)");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| PbiLinkError::Timeout {
            binary: self.binary.clone(),
        })?
        .map_err(|e| self.classify_spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PbiLinkError::ToolInvocation {
                message: format!(
                    "'{} {}' exited with {}: {}",
                    self.binary,
                    args.join(" "),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Launch the tool with `args` and return without awaiting completion.
    ///
    /// Stdio is disconnected; the process outlives this program.
    pub fn launch_detached(&self, args: &[&str]) -> PbiLinkResult<LaunchedTool> {
        debug!(binary = %self.binary, ?args, "launching tool (detached)");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| self.classify_spawn_error(e))?;

        Ok(LaunchedTool { child })
    }

    fn classify_spawn_error(&self, e: std::io::Error) -> PbiLinkError {
        if e.kind() == std::io::ErrorKind::NotFound {
            PbiLinkError::ToolMissing {
                binary: self.binary.clone(),
            }
        } else {
            PbiLinkError::ToolInvocation {
                message: format!("failed to start '{}': {}", self.binary, e),
            }
        }
    }
}
