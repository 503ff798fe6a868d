use std::time::Duration;

use http::header::CONTENT_TYPE;

use crate::builder::{self, Identity};
use crate::config::Config;
use crate::envelope;
use crate::error::{OvonAgentError, Result};
use crate::router::{self, Action};

/// Result of one forward round trip. The exact JSON exchanged rides along so
/// callers that want to display it do not depend on shared mutable state.
#[derive(Debug, Clone)]
pub struct ForwardOutcome {
    pub reply: String,
    pub sent_json: String,
    pub received_json: String,
}

/// Client side of the protocol: wraps a free-text question in an envelope,
/// POSTs it to a peer agent, and unwraps the peer's reply.
pub struct Forwarder {
    client: reqwest::Client,
    identity: Identity,
    conversation_id: String,
}

impl Forwarder {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.forward_connect_timeout_secs()))
            .timeout(Duration::from_secs(config.forward_timeout_secs()))
            .build()
            .map_err(|e| OvonAgentError::Runtime(e.to_string()))?;
        Ok(Self {
            client,
            identity: config.browser_identity(),
            conversation_id: config.outbound_conversation_id(),
        })
    }

    /// Single round trip, no invite handshake. An `invite` or unrecognized
    /// reply yields an empty reply string; transport and status failures are
    /// `Forward` errors, an undecodable success body is a `Decode` error.
    pub async fn forward(&self, peer_url: &str, question: &str) -> Result<ForwardOutcome> {
        let outbound =
            builder::build_outbound_question(&self.identity, &self.conversation_id, question);
        let sent = envelope::encode(&outbound)?;
        let sent_json = String::from_utf8_lossy(&sent).to_string();

        tracing::debug!(peer = peer_url, "forwarding question to peer agent");
        let response = self
            .client
            .post(peer_url)
            .header(CONTENT_TYPE, "application/json")
            .body(sent)
            .send()
            .await
            .map_err(|e| OvonAgentError::Forward(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| OvonAgentError::Forward(e.to_string()))?;
        if !status.is_success() {
            return Err(OvonAgentError::Forward(format!(
                "peer returned {status}: {}",
                String::from_utf8_lossy(&body)
            )));
        }

        let received_json = String::from_utf8_lossy(&body).to_string();
        let inbound = envelope::decode(&body)?;
        let reply = match router::route(&inbound.ovon.events) {
            Some(Action::Utterance(text)) => text,
            Some(Action::Invite) | None => String::new(),
        };
        Ok(ForwardOutcome {
            reply,
            sent_json,
            received_json,
        })
    }
}
