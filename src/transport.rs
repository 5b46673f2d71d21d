//! The HTTP seam between [`Client`](crate::Client) and the network.

use async_trait::async_trait;
use reqwest::{Request, StatusCode};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::client::ClientError;

/// Error type transports report failures with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Executes prepared HTTP requests.
///
/// Implemented for [`reqwest::Client`]. A `Client` may be shared between
/// tasks only as far as its transport allows it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<reqwest::Response, BoxError>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<reqwest::Response, BoxError> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(Into::into)
    }
}

/// Sends `request` and decodes the response body as JSON.
///
/// The status code is not inspected; any response whose body decodes
/// is a success. Data after the first JSON value is ignored. The
/// response is consumed before decoding, so its connection is released
/// on every path.
pub(crate) async fn fetch_json<T, R>(
    transport: &T,
    request: Request,
) -> Result<(R, StatusCode), ClientError>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let response = transport
        .execute(request)
        .await
        .map_err(ClientError::Transport)?;

    let status = response.status();
    trace!(%status, "received response");

    let body = response
        .bytes()
        .await
        .map_err(|err| ClientError::Transport(err.into()))?;

    // Only the first JSON value counts; anything after it is ignored.
    let value = match serde_json::Deserializer::from_slice(&body)
        .into_iter::<R>()
        .next()
    {
        Some(value) => value?,
        None => serde_json::from_slice(&body)?,
    };

    Ok((value, status))
}
