use crate::domain::error::{PbiLinkError, PbiLinkResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Record of a persistent search-path update.
///
/// Updating PATH mutates durable environment state outside this process:
/// the change only takes effect after the user restarts their shell, so
/// callers must surface `target` and that restart requirement explicitly.
#[derive(Debug)]
pub struct PathRegistration {
    /// Directory that was registered
    pub entry: PathBuf,
    /// Whether anything was written (false when already registered)
    pub changed: bool,
    /// Where the entry was recorded, for the user-facing notice
    pub target: String,
}

/// Append `dir` to the user's persistent search path.
#[cfg(windows)]
pub fn register_install_dir(dir: &Path) -> PbiLinkResult<PathRegistration> {
    let current = std::env::var("PATH").unwrap_or_default();
    let Some(updated) = appended_path_value(&current, dir) else {
        return Ok(PathRegistration {
            entry: dir.to_path_buf(),
            changed: false,
            target: "user PATH".to_string(),
        });
    };

    let output = std::process::Command::new("setx")
        .arg("PATH")
        .arg(&updated)
        .output()
        .map_err(|e| PbiLinkError::Install {
            message: format!("failed to run setx: {}", e),
        })?;
    if !output.status.success() {
        return Err(PbiLinkError::Install {
            message: format!(
                "setx PATH exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    info!(dir = %dir.display(), "install dir added to user PATH");
    Ok(PathRegistration {
        entry: dir.to_path_buf(),
        changed: true,
        target: "user PATH".to_string(),
    })
}

/// Append `dir` to the user's persistent search path via `~/.profile`.
#[cfg(not(windows))]
pub fn register_install_dir(dir: &Path) -> PbiLinkResult<PathRegistration> {
    let profile = dirs::home_dir()
        .ok_or_else(|| PbiLinkError::Install {
            message: "could not determine home directory".to_string(),
        })?
        .join(".profile");

    let changed = append_profile_line(&profile, dir)?;
    if changed {
        info!(dir = %dir.display(), profile = %profile.display(), "install dir added to PATH");
    }
    Ok(PathRegistration {
        entry: dir.to_path_buf(),
        changed,
        target: profile.display().to_string(),
    })
}

/// New PATH value with `dir` appended, or `None` when already present
/// (compared case-insensitively, as the host resolves paths that way).
#[cfg(windows)]
fn appended_path_value(current: &str, dir: &Path) -> Option<String> {
    let entry = dir.to_string_lossy();
    let already = current
        .split(';')
        .any(|p| p.trim().eq_ignore_ascii_case(entry.as_ref()));
    if already {
        None
    } else if current.is_empty() {
        Some(entry.into_owned())
    } else {
        Some(format!("{};{}", current.trim_end_matches(';'), entry))
    }
}

#[cfg(not(windows))]
fn append_profile_line(profile: &Path, dir: &Path) -> PbiLinkResult<bool> {
    use std::io::Write;

    let line = path_export_line(dir);
    let existing = match std::fs::read_to_string(profile) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.lines().any(|l| l.trim() == line) {
        return Ok(false);
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(profile)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{}", line)?;
    Ok(true)
}

#[cfg(not(windows))]
fn path_export_line(dir: &Path) -> String {
    format!("export PATH=\"$PATH:{}\"", dir.display())
}
