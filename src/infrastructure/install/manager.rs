use crate::domain::error::{PbiLinkError, PbiLinkResult};
use crate::infrastructure::install::download::download_archive;
use crate::infrastructure::install::path_env::{register_install_dir, PathRegistration};
use crate::infrastructure::install::unpack::unpack_archive;
use crate::infrastructure::process::ToolRunner;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Probe argument: the tool's read-only status command.
const PROBE_ARG: &str = "info";

/// Archive file name used while installing.
const ARCHIVE_NAME: &str = "pbi-tools.zip";

/// Result of [`InstallManager::ensure_installed`].
#[derive(Debug)]
pub enum InstallOutcome {
    /// The probe found a working tool; nothing was downloaded.
    AlreadyInstalled,
    /// The tool was downloaded, unpacked and registered on PATH.
    Installed {
        install_dir: PathBuf,
        registration: PathRegistration,
    },
}

/// Whether the probe found the tool.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    Installed,
    NotInstalled,
}

/// Ensures the external tool is present, downloading and unpacking a release
/// when it is not.
///
/// "Installed" is never persisted anywhere; every run re-probes by invoking
/// the tool, which makes `ensure_installed` safe to re-run after a partial
/// failure.
pub struct InstallManager {
    runner: ToolRunner,
    install_dir: PathBuf,
    download_url: String,
    download_timeout: Duration,
}

impl InstallManager {
    pub fn new(
        runner: ToolRunner,
        install_dir: PathBuf,
        download_url: String,
        download_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            install_dir,
            download_url,
            download_timeout,
        }
    }

    /// Probe for the tool and install it when missing.
    pub async fn ensure_installed(&self) -> PbiLinkResult<InstallOutcome> {
        match self.probe().await? {
            ProbeOutcome::Installed => {
                info!(binary = self.runner.binary(), "tool already installed");
                Ok(InstallOutcome::AlreadyInstalled)
            }
            ProbeOutcome::NotInstalled => {
                info!(
                    binary = self.runner.binary(),
                    url = %self.download_url,
                    "tool not found, installing"
                );
                let registration = self.install().await?;
                Ok(InstallOutcome::Installed {
                    install_dir: self.install_dir.clone(),
                    registration,
                })
            }
        }
    }

    /// Invoke the tool's status command to classify the install state.
    ///
    /// A spawn failure of kind "not found" means the tool is not installed;
    /// any other failure is a hard probe error, distinct from both outcomes.
    pub(crate) async fn probe(&self) -> PbiLinkResult<ProbeOutcome> {
        match self.runner.run_capture(&[PROBE_ARG]).await {
            Ok(_) => Ok(ProbeOutcome::Installed),
            Err(PbiLinkError::ToolMissing { .. }) => Ok(ProbeOutcome::NotInstalled),
            Err(e) => Err(PbiLinkError::Probe {
                message: e.to_string(),
            }),
        }
    }

    async fn install(&self) -> PbiLinkResult<PathRegistration> {
        let created_dir = !self.install_dir.exists();
        std::fs::create_dir_all(&self.install_dir)?;

        let archive = self.install_dir.join(ARCHIVE_NAME);
        if let Err(e) = download_archive(&self.download_url, &archive, self.download_timeout).await
        {
            // Do not leave a half-created installation behind
            if created_dir {
                if let Err(remove_err) = std::fs::remove_dir_all(&self.install_dir) {
                    warn!(
                        dir = %self.install_dir.display(),
                        error = %remove_err,
                        "failed to remove install dir after download failure"
                    );
                }
            }
            return Err(e);
        }

        let unpacked = unpack_archive(&archive, &self.install_dir);
        if let Err(remove_err) = std::fs::remove_file(&archive) {
            warn!(archive = %archive.display(), error = %remove_err, "failed to remove archive");
        }
        unpacked?;

        register_install_dir(&self.install_dir)
    }
}
