//! Client for the [mcsrvstat.us](https://api.mcsrvstat.us/) status API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Method, Request, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::status::Status;
use crate::transport::{self, BoxError, Transport};

const DEFAULT_BASE_URL: &str = "https://api.mcsrvstat.us/";
const DEFAULT_USER_AGENT: &str = concat!("mcsrvstat-rs/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2";
const MEDIA_TYPE: &str = "application/json";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base URL \"{url}\"")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot build a request URL from base \"{0}\"")]
    InvalidRequestUrl(Url),

    #[error("invalid server address \"{0}\"")]
    InvalidAddress(String),

    #[error("invalid user agent \"{user_agent}\"")]
    InvalidUserAgent {
        user_agent: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("failed to send request")]
    Transport(#[source] BoxError),

    #[error("invalid JSON response")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout(#[from] tokio::time::error::Elapsed),
}

/// Settings a [`Client`] is built from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub user_agent: String,
}

impl ClientConfig {
    fn new() -> Result<Self, ClientError> {
        Ok(ClientConfig {
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }
}

fn parse_base_url(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|source| ClientError::InvalidBaseUrl {
        url: url.to_string(),
        source,
    })
}

/// Caller-supplied configuration step, see [`ClientOption::custom`].
pub type ConfigFn = Arc<dyn Fn(&mut ClientConfig) -> Result<(), ClientError> + Send + Sync>;

/// A single configuration change applied while building a [`Client`].
#[derive(Clone)]
pub enum ClientOption {
    /// Replaces the base URL requests are resolved against.
    BaseUrl(String),

    /// Prepends a product token to the user agent, separated by a space.
    UserAgent(String),

    /// Runs an arbitrary, possibly failing, change on the config.
    Custom(ConfigFn),
}

impl ClientOption {
    /// Wraps a closure as a [`ClientOption::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut ClientConfig) -> Result<(), ClientError> + Send + Sync + 'static,
    {
        ClientOption::Custom(Arc::new(f))
    }

    fn apply(self, config: &mut ClientConfig) -> Result<(), ClientError> {
        match self {
            ClientOption::BaseUrl(url) => {
                config.base_url = parse_base_url(&url)?;
            }
            ClientOption::UserAgent(user_agent) => {
                config.user_agent = format!("{} {}", user_agent, config.user_agent);
            }
            ClientOption::Custom(f) => f(config)?,
        }
        Ok(())
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::BaseUrl(url) => f.debug_tuple("BaseUrl").field(url).finish(),
            ClientOption::UserAgent(user_agent) => {
                f.debug_tuple("UserAgent").field(user_agent).finish()
            }
            ClientOption::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Queries server status over HTTP.
#[derive(Debug)]
pub struct Client<T = reqwest::Client> {
    transport: T,
    config: ClientConfig,
}

impl Client {
    /// Builds a client with a fresh `reqwest` transport and the
    /// default settings.
    pub fn new() -> Result<Self, ClientError> {
        Client::with_options(Vec::new())
    }

    /// Builds a client with a fresh `reqwest` transport.
    ///
    /// Options are applied in order; the first one that fails aborts
    /// construction and its error is returned.
    pub fn with_options<I>(options: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        Client::with_transport(reqwest::Client::new(), options)
    }
}

impl<T: Transport> Client<T> {
    /// Builds a client around an existing transport.
    ///
    /// Options are applied in order; the first one that fails aborts
    /// construction and its error is returned.
    pub fn with_transport<I>(transport: T, options: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        let mut config = ClientConfig::new()?;
        for option in options {
            option.apply(&mut config)?;
        }

        Ok(Client { transport, config })
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds the `GET {base}/2/{address}` request for `address`.
    ///
    /// The address becomes a single percent-encoded path segment. A
    /// trailing slash on the base URL does not change the result.
    /// `.` and `..` cannot be expressed as a segment and are rejected.
    pub fn build_request(&self, address: &str) -> Result<Request, ClientError> {
        if address == "." || address == ".." {
            return Err(ClientError::InvalidAddress(address.to_string()));
        }

        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequestUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .push(API_VERSION)
            .push(address);

        let user_agent = HeaderValue::from_str(&self.config.user_agent).map_err(|source| {
            ClientError::InvalidUserAgent {
                user_agent: self.config.user_agent.clone(),
                source,
            }
        })?;

        let mut request = Request::new(Method::GET, url);
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(MEDIA_TYPE));
        headers.insert(USER_AGENT, user_agent);

        Ok(request)
    }

    /// Fetches the status of the server at `address`
    /// (`host` or `host:port`).
    pub async fn status(&self, address: &str) -> Result<Status, ClientError> {
        self.status_with_response(address)
            .await
            .map(|(status, _)| status)
    }

    /// Like [`status`](Self::status), also returning the HTTP status
    /// code the API answered with.
    #[instrument(skip(self))]
    pub async fn status_with_response(
        &self,
        address: &str,
    ) -> Result<(Status, StatusCode), ClientError> {
        let request = self.build_request(address)?;
        debug!(url = %request.url(), "requesting server status");

        transport::fetch_json(&self.transport, request).await
    }

    /// Like [`status`](Self::status), failing with
    /// [`ClientError::Timeout`] if no answer arrives within `deadline`.
    pub async fn status_with_deadline(
        &self,
        address: &str,
        deadline: Duration,
    ) -> Result<Status, ClientError> {
        tokio::time::timeout(deadline, self.status(address)).await?
    }
}
