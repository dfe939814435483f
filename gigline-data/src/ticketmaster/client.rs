//! Blocking Discovery API client behind the `EventSource` trait.

use std::time::Duration;

use gigline_core::{EventSource, FetchError, Page, PageRequest};
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::response::EventsResponse;

/// Production Discovery API host.
pub const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com";

/// Path of the event search endpoint, relative to the base URL.
pub const EVENTS_PATH: &str = "discovery/v2/events.json";

/// Default user agent for Discovery API requests.
pub const DEFAULT_USER_AGENT: &str = "gigline-ingest/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "apikey";

const REDACTED: &str = "REDACTED";

/// Errors raised while constructing an [`HttpEventSource`].
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// The base URL could not be parsed.
    #[error("invalid base URL '{url}'")]
    BaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The API key was blank.
    #[error("an API key is required")]
    MissingApiKey,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpEventSource`].
#[derive(Clone)]
pub struct HttpEventSourceConfig {
    /// Service root, e.g. `"https://app.ticketmaster.com"`.
    pub base_url: String,
    /// Consumer key sent as the `apikey` query parameter.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for HttpEventSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEventSourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &REDACTED)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpEventSourceConfig {
    /// Create a configuration for the production host.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the source at another host, such as a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Discovery API event source.
///
/// Each call to [`EventSource::fetch_page`] issues exactly one GET request.
/// No retries happen here; the pipeline's run policy owns that decision.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, or inside a `current_thread` runtime, requests
/// run on the source's own runtime. Inside a multi-threaded runtime the
/// ambient handle is used through [`tokio::task::block_in_place`].
pub struct HttpEventSource {
    client: Client,
    config: HttpEventSourceConfig,
    endpoint: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEventSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpEventSource {
    /// Create a source for the production host.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpEventSourceConfig::new(api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank, the base URL does not parse, or
    /// the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpEventSourceConfig) -> Result<Self, SourceBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(SourceBuildError::MissingApiKey);
        }
        let endpoint_text = format!("{}/{EVENTS_PATH}", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint_text).map_err(|source| SourceBuildError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime,
        })
    }

    /// Build the search URL for `request`, including the API key.
    fn build_events_url(&self, request: &PageRequest<'_>) -> Url {
        let query = request.query;
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(API_KEY_PARAM, &self.config.api_key);
            pairs.append_pair("keyword", query.genre());
            if let Some(code) = &query.country_code {
                pairs.append_pair("countryCode", code);
            }
            if let Some(start) = &query.start_date_time {
                pairs.append_pair("startDateTime", start);
            }
            if let Some(end) = &query.end_date_time {
                pairs.append_pair("endDateTime", end);
            }
            pairs.append_pair("size", &query.page_size.to_string());
            pairs.append_pair("page", &request.page_index.to_string());
        }
        url
    }

    /// Fetch one page asynchronously.
    async fn fetch_page_async(&self, url: Url) -> Result<Page, FetchError> {
        let shown = redact_api_key(&url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;

        let body: EventsResponse = response
            .json()
            .await
            .map_err(|err| self.convert_reqwest_error(err, &shown))?;

        Ok(body.into_page())
    }

    /// Convert a reqwest error to a [`FetchError`].
    ///
    /// The URL is stripped from the error before formatting so the API key
    /// never reaches logs.
    fn convert_reqwest_error(&self, raw: reqwest::Error, url: &str) -> FetchError {
        let error = raw.without_url();
        if error.is_timeout() {
            return FetchError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return FetchError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return FetchError::Decode {
                url: url.to_owned(),
                message: error.to_string(),
            };
        }

        FetchError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl EventSource for HttpEventSource {
    /// Fetch the requested page.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded for the ambient handle to be used. A `current_thread`
    /// caller falls back to the internal runtime and blocks its own executor
    /// for the duration of the request.
    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        request.validate()?;
        let url = self.build_events_url(request);
        debug!(
            "requesting page {} of '{}' from {}",
            request.page_index,
            request.query.genre(),
            redact_api_key(&url)
        );

        let future = self.fetch_page_async(url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Render `url` with the API key replaced.
fn redact_api_key(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let shown = if name == API_KEY_PARAM {
                REDACTED.to_owned()
            } else {
                value.into_owned()
            };
            (name.into_owned(), shown)
        })
        .collect();
    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}
