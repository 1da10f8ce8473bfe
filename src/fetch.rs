//! Menu retrieval through the upstream's asynchronous job endpoint.
//!
//! A fetch is three acts: submit the retrieval job, sit out the venue's
//! learned wait, then poll the returned resource URL until the document
//! reports READY. Every failure mode feeds the venue's learned wait via
//! [`BackoffStore::increase`]; only a READY document resets it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::backoff::BackoffStore;
use crate::config::VenueConfig;
use crate::pos::{MenuDocument, MenuSnapshot, PosApiError, PosClient};

/// Tunables for the submit/wait/poll cycle.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Poll attempts before giving up on a submitted job.
    pub poll_attempts: u32,
    /// Fixed sleep between poll attempts.
    pub poll_interval: Duration,
    /// When set, READY menu documents are archived here as JSON.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            poll_attempts: 8,
            poll_interval: Duration::from_secs(6),
            snapshot_dir: None,
        }
    }
}

/// Ways a menu fetch can fail. Each one lengthens the venue's learned wait.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The submission came back with anything but 202.
    #[error("menu request rejected (status {status})")]
    SubmissionRejected { status: u16 },

    /// The job was accepted but the response carried no resource URL.
    #[error("menu job accepted without a resource URL")]
    MissingResourceLocator,

    /// The submission never reached the service.
    #[error("menu request failed: {0}")]
    Transport(String),

    /// The poll budget ran out before the document went READY.
    #[error("menu not ready after {attempts} poll attempts")]
    NotReadyTimeout { attempts: u32 },
}

/// Fetch the menu document for a venue.
///
/// The learned wait is consumed between submission and the first poll,
/// which is where the upstream spends most of its rendering time. Poll
/// errors and not-ready documents are transient within the attempt
/// budget; exhausting the budget is a fetch failure.
pub async fn fetch_menu(
    client: &PosClient,
    store: &mut dyn BackoffStore,
    policy: &FetchPolicy,
    venue: &VenueConfig,
) -> Result<MenuSnapshot, FetchError> {
    let venue_id = venue.venue_id.as_str();
    info!(venue_id, "fetching menu");

    let resource_url = match client.submit_menu_job(venue).await {
        Ok(url) => url,
        Err(err) => {
            let next_wait = store.increase(venue_id);
            warn!(venue_id, next_wait_secs = next_wait, error = %err, "menu job submission failed");
            return Err(match err {
                PosApiError::UnexpectedStatus { status, .. } => {
                    FetchError::SubmissionRejected { status }
                }
                PosApiError::MissingResourceUrl => FetchError::MissingResourceLocator,
                PosApiError::Network(err) => FetchError::Transport(err.to_string()),
            });
        }
    };

    let wait_secs = store.get(venue_id);
    info!(venue_id, wait_secs, "menu job submitted, waiting before first poll");
    sleep(Duration::from_secs(wait_secs)).await;

    for attempt in 1..=policy.poll_attempts {
        match client.fetch_menu_document(&resource_url).await {
            Ok(mut document) if document.is_ready() => {
                store.reset(venue_id);
                info!(venue_id, attempt, "menu ready");
                document.venue_id = Some(venue_id.to_string());
                if let Some(dir) = &policy.snapshot_dir {
                    archive_snapshot(dir, venue_id, &document);
                }
                return Ok(document.into_snapshot(venue_id.to_string()));
            }
            Ok(document) => {
                debug!(venue_id, attempt, status = %document.status, "menu not ready yet");
            }
            Err(err) => {
                warn!(venue_id, attempt, error = %err, "menu poll failed");
            }
        }
        if attempt < policy.poll_attempts {
            sleep(policy.poll_interval).await;
        }
    }

    let next_wait = store.increase(venue_id);
    warn!(
        venue_id,
        attempts = policy.poll_attempts,
        next_wait_secs = next_wait,
        "menu never went ready"
    );
    Err(FetchError::NotReadyTimeout {
        attempts: policy.poll_attempts,
    })
}

/// Best-effort archive of a READY document; failures only warn.
fn archive_snapshot(dir: &Path, venue_id: &str, document: &MenuDocument) {
    let stamp = Utc::now().format("%Y%m%d_%H%M");
    let path = dir.join(format!("menu_{venue_id}_{stamp}.json"));
    match try_archive(dir, &path, document) {
        Ok(()) => debug!(venue_id, path = %path.display(), "menu snapshot archived"),
        Err(err) => {
            warn!(venue_id, path = %path.display(), error = %err, "could not archive menu snapshot");
        }
    }
}

fn try_archive(dir: &Path, path: &Path, document: &MenuDocument) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(document).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
