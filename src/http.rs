use crate::model::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("quarterly-report/", env!("CARGO_PKG_VERSION"));

pub fn build_client(service: &'static str) -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .build()
        .map_err(|err| Error::transport(service, err))
}

/// Sends `request` and decodes a JSON body, keeping the response headers.
pub async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<(T, HeaderMap)> {
    let response = request
        .send()
        .await
        .map_err(|err| Error::transport(service, err))?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|err| Error::transport(service, err))?;
    debug!(target: "http", service, status = status.as_u16(), len = body.len(), "response");

    if !status.is_success() {
        return Err(Error::from_status(service, status, body));
    }
    let value = serde_json::from_str(&body).map_err(|err| Error::decode(service, err, &body))?;
    Ok((value, headers))
}
