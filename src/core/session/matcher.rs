use crate::core::status::{Session, StatusReport};
use crate::domain::error::{PbiLinkError, PbiLinkResult};
use std::path::Path;

/// Find the session bound to `target` in a status report.
///
/// The target is normalized to an absolute, lower-cased path and compared
/// case-insensitively against each session's path, in report order. Host
/// filesystem paths are not case-sensitive in the environments Power BI
/// Desktop runs in, so casing differences on either side must not prevent a
/// match. When several sessions reference the same file the first one wins.
///
/// `Ok(None)` means the file is simply not open in the external application.
/// That is an expected outcome, distinct from status-query failures.
pub fn find_session<'a>(
    target: &Path,
    report: &'a StatusReport,
) -> PbiLinkResult<Option<&'a Session>> {
    let needle = normalize_path(target)?;
    Ok(report
        .sessions
        .iter()
        .find(|session| session.pbix_path.to_lowercase() == needle))
}

/// Normalize a path for session comparison: resolve relative paths against
/// the current directory, then lower-case the textual form.
pub(crate) fn normalize_path(path: &Path) -> PbiLinkResult<String> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| PbiLinkError::Config {
                message: format!("failed to resolve current directory: {}", e),
            })?
            .join(path)
    };
    Ok(absolute.to_string_lossy().to_lowercase())
}
