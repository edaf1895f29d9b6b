//! Shared plumbing for the reqwest-backed collaborators.

use crate::error::{BridgeError, Result, Service};
use serde::de::DeserializeOwned;
use std::time::Duration;

const USER_AGENT: &str = concat!("ticket-bridge/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(service: Service, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| {
            BridgeError::upstream(service, format!("failed to initialize HTTP client: {e}"))
        })
}

/// Send `request` and decode a successful JSON body.
///
/// Non-2xx responses become [`BridgeError::UpstreamStatus`]; the full status
/// and a truncated body are logged for the operator.
pub(crate) async fn send_json<T: DeserializeOwned>(
    service: Service,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| BridgeError::upstream(service, e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| BridgeError::upstream(service, format!("failed to read response: {e}")))?;

    if !status.is_success() {
        let body = truncate_for_error(&body);
        tracing::warn!(%service, status = status.as_u16(), %body, "upstream call rejected");
        return Err(BridgeError::UpstreamStatus {
            service,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(%service, body = %truncate_for_error(&body), "undecodable upstream response");
        BridgeError::upstream(service, format!("failed to parse response JSON: {e}"))
    })
}

pub(crate) fn truncate_for_error(body: &str) -> String {
    const MAX_LEN: usize = 200;
    if body.chars().count() <= MAX_LEN {
        body.to_owned()
    } else {
        format!("{}...", body.chars().take(MAX_LEN).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_for_error("Not Found"), "Not Found");
    }

    #[test]
    fn long_bodies_are_truncated_on_char_boundaries() {
        let body = "é".repeat(250);
        let truncated = truncate_for_error(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }
}
