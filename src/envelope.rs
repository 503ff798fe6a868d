use serde::{Deserialize, Serialize};

use crate::error::{OvonAgentError, Result};

/// Root OVON interchange message. The JSON nesting
/// (`ovon.conversation.id`, `ovon.sender.from`, `ovon.events[].eventType`, ...)
/// is the wire contract and must not be flattened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    pub ovon: OvonBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvonBody {
    pub conversation: Conversation,
    pub sender: Sender,
    #[serde(rename = "responseCode")]
    pub response_code: i64,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sender {
    pub from: String,
}

/// A typed unit within an envelope. `event_type` values other than
/// `invite` and `utterance` are carried but never acted on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    #[serde(rename = "dialogEvent")]
    pub dialog_event: DialogEvent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogEvent {
    #[serde(rename = "speakerId")]
    pub speaker_id: String,
    pub span: Span,
    pub features: Features,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    /// Free-form timestamp string, never parsed.
    #[serde(rename = "startTime")]
    pub start_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub text: TextFeature,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFeature {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Token {
    pub value: String,
}

/// Parses an envelope from raw JSON bytes. Absent fields take their zero
/// value; malformed JSON is a `Decode` error rather than a zeroed envelope,
/// so callers can answer with an explicit protocol error.
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    serde_json::from_slice(bytes).map_err(|e| OvonAgentError::Decode(e.to_string()))
}

/// Serializes an envelope with every declared field present.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>> {
    serde_json::to_vec(envelope).map_err(|e| OvonAgentError::Serialization(e.to_string()))
}
