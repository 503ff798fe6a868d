use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::builder::Identity;
use crate::error::{OvonAgentError, Result};

const DEFAULT_SENDER_FROM: &str = "https://www.someserver.com/ovontest";
const DEFAULT_BROWSER_SENDER_FROM: &str = "https://www.someserver.com/getresponse";
const DEFAULT_SPEAKER_ID: &str = "basic-agent";
const DEFAULT_BROWSER_SPEAKER_ID: &str = "textBrowser";
const DEFAULT_OUTBOUND_CONVERSATION_ID: &str = "OvonDemo137";
const DEFAULT_FORWARD_CONNECT_TIMEOUT_SECS: u64 = 3;
const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Sender URL stamped on envelopes this agent produces.
    pub sender_from: Option<String>,
    /// Sender URL stamped on envelopes the browser endpoint forwards.
    pub browser_sender_from: Option<String>,
    pub speaker_id: Option<String>,
    pub browser_speaker_id: Option<String>,
    /// Conversation id used when this side initiates a forward.
    pub outbound_conversation_id: Option<String>,
    pub forward_connect_timeout_secs: Option<u64>,
    pub forward_timeout_secs: Option<u64>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| OvonAgentError::Config(e.to_string()))?;
        let config: Config =
            serde_json::from_str(&content).map_err(|e| OvonAgentError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn agent_identity(&self) -> Identity {
        Identity {
            sender_from: self
                .sender_from
                .clone()
                .unwrap_or_else(|| DEFAULT_SENDER_FROM.to_string()),
            speaker_id: self
                .speaker_id
                .clone()
                .unwrap_or_else(|| DEFAULT_SPEAKER_ID.to_string()),
        }
    }

    pub fn browser_identity(&self) -> Identity {
        Identity {
            sender_from: self
                .browser_sender_from
                .clone()
                .unwrap_or_else(|| DEFAULT_BROWSER_SENDER_FROM.to_string()),
            speaker_id: self
                .browser_speaker_id
                .clone()
                .unwrap_or_else(|| DEFAULT_BROWSER_SPEAKER_ID.to_string()),
        }
    }

    pub fn outbound_conversation_id(&self) -> String {
        self.outbound_conversation_id
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTBOUND_CONVERSATION_ID.to_string())
    }

    pub fn forward_connect_timeout_secs(&self) -> u64 {
        self.forward_connect_timeout_secs
            .unwrap_or(DEFAULT_FORWARD_CONNECT_TIMEOUT_SECS)
    }

    pub fn forward_timeout_secs(&self) -> u64 {
        self.forward_timeout_secs
            .unwrap_or(DEFAULT_FORWARD_TIMEOUT_SECS)
    }
}
