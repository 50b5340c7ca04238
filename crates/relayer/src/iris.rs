//! HTTP client of the burn/mint attestation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use stable_router_primitives::{types::MessageId, Bytes};
use tracing::debug;

use crate::attestation::{AttestationError, AttestationService, AttestationStatus};

/// Status reported by the service once a message is attested.
const STATUS_COMPLETE: &str = "complete";

/// The body of `GET /v1/attestations/{message_hash}`.
#[derive(Debug, Deserialize)]
struct AttestationResponse {
    status: String,

    /// Hex encoded. The service reports `PENDING` here until the message is attested.
    #[serde(default)]
    attestation: Option<String>,

    /// Hex encoded. Not returned by every deployment of the service.
    #[serde(default)]
    message: Option<String>,
}

/// An [`AttestationService`] backed by the attestation service's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpAttestationClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAttestationClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AttestationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AttestationError::Transport(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_hex(field: &str, value: &str) -> Result<Bytes, AttestationError> {
    value
        .parse::<Bytes>()
        .map_err(|e| AttestationError::Malformed(format!("{field}: {e}")))
}

#[async_trait]
impl AttestationService for HttpAttestationClient {
    async fn get_attestation(
        &self,
        message_id: MessageId,
    ) -> Result<AttestationStatus, AttestationError> {
        let url = format!("{}/v1/attestations/{message_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AttestationError::Transport(e.to_string()))?;

        // the service does not know about a message until the source chain's block is indexed
        if response.status() == StatusCode::NOT_FOUND {
            debug!(%message_id, "message not indexed by the attestation service yet");
            return Ok(AttestationStatus::Pending);
        }

        if !response.status().is_success() {
            return Err(AttestationError::Transport(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        let body = response
            .json::<AttestationResponse>()
            .await
            .map_err(|e| AttestationError::Malformed(e.to_string()))?;

        let attestation = match (body.status.as_str(), body.attestation.as_deref()) {
            (STATUS_COMPLETE, Some(attestation)) if attestation.starts_with("0x") => attestation,
            (status, _) => {
                debug!(%message_id, %status, "message not attested yet");
                return Ok(AttestationStatus::Pending);
            }
        };

        Ok(AttestationStatus::Complete {
            message: body
                .message
                .as_deref()
                .map(|m| parse_hex("message", m))
                .transpose()?,
            attestation: parse_hex("attestation", attestation)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use stable_router_primitives::B256;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn message_id() -> MessageId {
        MessageId::new(B256::repeat_byte(0x5a))
    }

    fn client(server: &MockServer) -> HttpAttestationClient {
        HttpAttestationClient::new(&format!("{}/", server.uri()), Duration::from_secs(1)).unwrap()
    }

    async fn respond_with(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/attestations/{}", message_id())))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unknown_message_is_pending() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(404)).await;

        let status = client(&server).get_attestation(message_id()).await;

        assert_eq!(status, Ok(AttestationStatus::Pending));
    }

    #[tokio::test]
    async fn pending_confirmations_is_pending() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "pending_confirmations",
                "attestation": "PENDING"
            })),
        )
        .await;

        let status = client(&server).get_attestation(message_id()).await;

        assert_eq!(status, Ok(AttestationStatus::Pending));
    }

    #[tokio::test]
    async fn complete_attestation_is_decoded() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "complete",
                "attestation": "0xa7a7",
                "message": "0x0102"
            })),
        )
        .await;

        let status = client(&server).get_attestation(message_id()).await;

        assert_eq!(
            status,
            Ok(AttestationStatus::Complete {
                message: Some(Bytes::from(vec![1, 2])),
                attestation: Bytes::from(vec![0xa7, 0xa7]),
            })
        );
    }

    #[tokio::test]
    async fn server_errors_are_transport_errors() {
        let server = MockServer::start().await;
        respond_with(&server, ResponseTemplate::new(503)).await;

        let status = client(&server).get_attestation(message_id()).await;

        assert!(matches!(status, Err(AttestationError::Transport(_))));
    }

    #[tokio::test]
    async fn garbage_is_malformed() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "complete",
                "attestation": "0xnothex"
            })),
        )
        .await;

        let status = client(&server).get_attestation(message_id()).await;

        assert!(matches!(status, Err(AttestationError::Malformed(_))));
    }
}
