//! Directory lookup HTTP client.
//!
//! The [`LookupClient`] issues exactly one GET per lookup against the
//! directory endpoint. There is no caching and no retry: a failed or
//! cancelled lookup is reported and the caller decides whether to ask again.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dlookup_client::LookupClient;
//! use dlookup_common::config::LookupConfig;
//!
//! #[tokio::main]
//! async fn main() -> dlookup_client::Result<()> {
//!     let client = LookupClient::new(&LookupConfig::default())?;
//!     let response = client.lookup("Jordan Mann").await?;
//!     for user in &response.users {
//!         println!("{} <{}>", user.display_name(), user.mail().unwrap_or("-"));
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use dlookup_common::config::LookupConfig;
use dlookup_common::models::LookupResponse;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{LookupError, Result};

/// Attributes requested for every entry, in the order the API is asked for them.
pub const REQUESTED_FIELDS: [&str; 9] = [
    "uid",
    "displayName",
    "eduPersonPrimaryAffiliation",
    "mail",
    "eduPersonNickname",
    "dcDeptclass",
    "dcAffiliation",
    "telephoneNumber",
    "dcHinmanaddr",
];

/// Escape set for `q`: only RFC 3986 unreserved characters pass through.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for the directory lookup endpoint.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct LookupClient {
    http: Client,
    endpoint: Url,
}

impl LookupClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`LookupError::InvalidSearch`] if `base_url` is not a URL.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http, endpoint })
    }

    /// Full request URL for `query`.
    ///
    /// `q` is percent-encoded, alumni are always excluded, and the fixed
    /// [`REQUESTED_FIELDS`] list follows.
    pub fn query_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.set_query(Some(&format!("q={}", utf8_percent_encode(query, QUERY_VALUE))));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("includeAlum", "false");
            for field in REQUESTED_FIELDS {
                pairs.append_pair("field", field);
            }
        }
        url
    }

    // ── Lookup ───────────────────────────────────────────────────────────────

    /// Look up directory entries matching `query`.
    ///
    /// `GET <endpoint>?q=<query>&includeAlum=false&field=…`
    pub async fn lookup(&self, query: &str) -> Result<LookupResponse> {
        if query.is_empty() {
            return Err(LookupError::EmptySearch);
        }

        let url = self.query_url(query);
        debug!("Directory GET {}", url);
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let body = resp.bytes().await?;

        let decoded: LookupResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!("Directory response for {:?} did not decode: {}", query, e);
            LookupError::ParseError(e)
        })?;

        if decoded.truncated {
            info!(
                "Directory truncated results for {:?} at {} entries",
                query,
                decoded.users.len()
            );
        }
        debug!("Directory returned {} entries for {:?}", decoded.users.len(), query);
        Ok(decoded)
    }

    /// [`lookup`](Self::lookup), abandoned with [`LookupError::CancelError`]
    /// as soon as `cancel` fires.
    pub async fn lookup_cancellable(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<LookupResponse> {
        if query.is_empty() {
            return Err(LookupError::EmptySearch);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Directory lookup for {:?} cancelled", query);
                Err(LookupError::CancelError)
            }
            res = self.lookup(query) => res,
        }
    }
}
