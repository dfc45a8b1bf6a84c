//! Version-check notifier.
//!
//! Polls the hosting site's legacy version endpoint, whose whole answer is
//! one line of text holding the latest release's version string, and
//! compares it against the running plugin's version. Dev builds never
//! notify; nobody wants an "update available" nag on a build that is ahead
//! of the release channel.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{UpdateError, UpdateResult};
use crate::logging::log_error_chain;
use crate::types::Version;

/// The hosting site's legacy update endpoint.
const DEFAULT_ENDPOINT: &str = "https://api.spigotmc.org/legacy/update.php";

/// What one check concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Running the latest release (or something newer).
    UpToDate,
    /// A newer release exists.
    Available { latest: Version },
    /// The running build is `-dev` stamped; checks never notify.
    DevBuild,
}

/// Notified when a periodic check finds a newer release.
#[async_trait]
pub trait UpdateListener: Send + Sync {
    async fn on_update_available(&self, latest: &Version);
}

/// Checks one hosted resource for newer releases.
pub struct UpdateChecker {
    endpoint: String,
    resource_id: u64,
    current: Version,
    client: reqwest::Client,
}

impl UpdateChecker {
    pub fn new(resource_id: u64, current: Version) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            resource_id,
            current,
            client: reqwest::Client::new(),
        }
    }

    /// Points the checker at a different endpoint base. Tests aim this at
    /// a local mock server.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn current_version(&self) -> &Version {
        &self.current
    }

    /// Fetches the latest version line and compares. Network problems come
    /// back as [`UpdateError`]; the periodic task logs them instead of
    /// giving up.
    pub async fn check(&self) -> UpdateResult<UpdateStatus> {
        let latest = self.fetch_latest().await?;

        if self.current.is_dev_build() {
            debug!("running a dev build, skipping update notification");
            return Ok(UpdateStatus::DevBuild);
        }
        if latest > self.current {
            Ok(UpdateStatus::Available { latest })
        } else {
            Ok(UpdateStatus::UpToDate)
        }
    }

    async fn fetch_latest(&self) -> UpdateResult<Version> {
        let url = format!("{}?resource={}", self.endpoint, self.resource_id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(UpdateError::Status(response.status()));
        }

        let body = response.text().await?;
        let line = body.lines().next().map(str::trim).unwrap_or("");
        if line.is_empty() {
            return Err(UpdateError::EmptyResponse);
        }
        Ok(Version::parse(line))
    }

    /// Starts a periodic check task. Each tick runs [`check`](Self::check),
    /// invokes the listener on a new release, and logs failures. Abort (or
    /// drop) the returned handle to stop checking.
    pub fn spawn(self, interval: Duration, listener: Arc<dyn UpdateListener>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                debug!("Checking for update...");
                match self.check().await {
                    Ok(UpdateStatus::Available { latest }) => {
                        info!(
                            "Update available: {} (running {})",
                            latest, self.current
                        );
                        listener.on_update_available(&latest).await;
                    }
                    Ok(UpdateStatus::UpToDate) => debug!("no update available"),
                    Ok(UpdateStatus::DevBuild) => {}
                    Err(err) => {
                        log_error_chain(
                            "An error occurred while searching for an update! Are you offline?",
                            &err,
                        );
                    }
                }
            }
        })
    }
}
