use crate::domain::error::{PbiLinkError, PbiLinkResult};
use futures_util::StreamExt;
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Redirect hops followed before giving up. The release host chains through
/// a CDN, so a couple of hops are normal; anything deep is a broken or
/// hostile chain.
const MAX_REDIRECTS: usize = 10;

/// Download the release archive at `url` into `dest`.
///
/// Redirects are followed manually: 301/302/303/307/308 responses re-issue
/// the request against the resolved `Location` target, up to
/// [`MAX_REDIRECTS`] hops. Any other non-2xx terminal response fails the
/// download. A partially written `dest` is removed before an error is
/// returned.
pub async fn download_archive(url: &str, dest: &Path, timeout: Duration) -> PbiLinkResult<()> {
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .timeout(timeout)
        .build()
        .map_err(|e| PbiLinkError::Download {
            message: format!("failed to build HTTP client: {}", e),
        })?;

    let mut target = url.to_string();
    let mut hops = 0;

    let response = loop {
        let response = client
            .get(&target)
            .send()
            .await
            .map_err(|e| PbiLinkError::Download {
                message: format!("request to {} failed: {}", target, e),
            })?;

        if is_followable_redirect(response.status()) {
            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(PbiLinkError::Download {
                    message: format!("more than {} redirects from {}", MAX_REDIRECTS, url),
                });
            }
            target = redirect_target(&response)?;
            debug!(hop = hops, %target, "following redirect");
            continue;
        }

        if !response.status().is_success() {
            return Err(PbiLinkError::Download {
                message: format!("{} returned {}", target, response.status()),
            });
        }

        break response;
    };

    match write_body(response, dest).await {
        Ok(bytes) => {
            debug!(bytes, dest = %dest.display(), "download complete");
            Ok(())
        }
        Err(e) => {
            // Never leave a truncated archive behind
            if let Err(remove_err) = std::fs::remove_file(dest) {
                if remove_err.kind() != std::io::ErrorKind::NotFound {
                    warn!(dest = %dest.display(), error = %remove_err, "failed to remove partial download");
                }
            }
            Err(e)
        }
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(status.as_u16(), 301 | 302 | 303 | 307 | 308)
}

/// Resolve the `Location` header of a redirect response against the URL it
/// was served from (the target may be relative).
fn redirect_target(response: &reqwest::Response) -> PbiLinkResult<String> {
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| PbiLinkError::Download {
            message: format!("redirect from {} carries no Location header", response.url()),
        })?;

    let resolved = response
        .url()
        .join(location)
        .map_err(|e| PbiLinkError::Download {
            message: format!("invalid redirect target '{}': {}", location, e),
        })?;

    Ok(resolved.to_string())
}

async fn write_body(response: reqwest::Response, dest: &Path) -> PbiLinkResult<u64> {
    let mut file = tokio::fs::File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| PbiLinkError::Download {
            message: format!("download stream error: {}", e),
        })?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}
