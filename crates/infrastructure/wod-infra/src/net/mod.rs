use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use wod_config::{clamp_timeout_secs, REMOTE_EVENTS_PATH};
use wod_core::{Event, EventIdentity, EventPatch};

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid remote url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode events from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub fn default_http_client(timeout_secs: u64) -> Result<Client, NetError> {
    Client::builder()
        .timeout(Duration::from_secs(clamp_timeout_secs(timeout_secs)))
        .user_agent(concat!("wod-catalog/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(NetError::Client)
}

/// Parse `raw` and treat it as a directory base, so `https://host/api` and
/// `https://host/api/` address the same collection.
pub fn normalize_base_url(raw: &str) -> Result<Url, NetError> {
    let mut url = Url::parse(raw).map_err(|e| NetError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(NetError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a base url".into(),
        });
    }
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}

/// JSON document store speaking `GET {base}/events` and
/// `PATCH {base}/events/{identity}`.
#[derive(Debug, Clone)]
pub struct CatalogHttpClient {
    client: Client,
    base: Url,
}

impl CatalogHttpClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self, NetError> {
        Ok(Self {
            client,
            base: normalize_base_url(base_url)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn events_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.pop_if_empty().push(REMOTE_EVENTS_PATH);
        }
        url
    }

    fn event_url(&self, identity: &EventIdentity) -> Url {
        let mut url = self.events_url();
        // Identities contain spaces; push() percent-encodes them.
        if let Ok(mut segs) = url.path_segments_mut() {
            segs.push(identity.as_str());
        }
        url
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, NetError> {
        let url = self.events_url();
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| NetError::Request {
                url: url.to_string(),
                source,
            })?;
        if !resp.status().is_success() {
            return Err(NetError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        let bytes = resp.bytes().await.map_err(|source| NetError::Request {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| NetError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn patch_event(
        &self,
        identity: &EventIdentity,
        patch: &EventPatch,
    ) -> Result<(), NetError> {
        let url = self.event_url(identity);
        debug!("PATCH {} {:?}", url, patch.field_names());
        let resp = self
            .client
            .patch(url.clone())
            .json(patch)
            .send()
            .await
            .map_err(|source| NetError::Request {
                url: url.to_string(),
                source,
            })?;
        if !resp.status().is_success() {
            return Err(NetError::Status {
                url: url.to_string(),
                status: resp.status(),
            });
        }
        Ok(())
    }
}
