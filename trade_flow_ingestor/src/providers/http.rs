//! Blocking HTTP client shared by the providers.

use std::time::Duration;

use reqwest::{
    blocking::{Client, Response},
    header::{self, HeaderMap, HeaderValue},
};
use snafu::ResultExt;

use crate::{
    config::HttpConfig,
    providers::{
        ClientBuildSnafu, HttpSnafu, InvalidHeaderSnafu, ProviderError, ProviderInitError,
        StatusSnafu,
    },
};

/// Builds a client with the configured timeout, user agent and extra default headers.
pub fn build_client(
    config: &HttpConfig,
    extra_headers: &[(header::HeaderName, &str)],
) -> Result<Client, ProviderInitError> {
    let mut headers = HeaderMap::new();
    for (name, value) in extra_headers {
        let value = HeaderValue::from_str(value).context(InvalidHeaderSnafu {
            name: name.as_str(),
        })?;
        headers.insert(name.clone(), value);
    }

    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .build()
        .context(ClientBuildSnafu)
}

/// Sends a GET and returns the body of a successful response.
///
/// Non-2xx responses become [`ProviderError::Status`] carrying the body text.
pub fn get_text(
    client: &Client,
    url: &str,
    query: &[(String, String)],
) -> Result<String, ProviderError> {
    let response = client
        .get(url)
        .query(query)
        .send()
        .context(HttpSnafu { url })?;
    read_success(response, url)
}

fn read_success(response: Response, url: &str) -> Result<String, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .unwrap_or_else(|_| "Unknown API error".to_string());
        return StatusSnafu {
            url,
            status: status.as_u16(),
            body,
        }
        .fail();
    }
    response.text().context(HttpSnafu { url })
}
