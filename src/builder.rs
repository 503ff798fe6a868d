use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::envelope::{Envelope, Event, Token};
use crate::router::EVENT_UTTERANCE;

pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const READY_TOKEN: &str = "Ready";

/// Who an outbound envelope speaks as: the sender URL carried for protocol
/// compliance plus the dialog speaker id.
#[derive(Debug, Clone)]
pub struct Identity {
    pub sender_from: String,
    pub speaker_id: String,
}

/// Reply to a session invite: a single-token "Ready" utterance.
pub fn build_invite(identity: &Identity, conversation_id: &str) -> Envelope {
    build_utterance(identity, conversation_id, READY_TOKEN)
}

/// Reply to an utterance with the responder's text. Every envelope built
/// here carries exactly one event and responseCode 200.
pub fn build_utterance(identity: &Identity, conversation_id: &str, text: &str) -> Envelope {
    utterance_envelope(identity, conversation_id, text, 200)
}

/// Question envelope sent by the forwarding side.
pub fn build_outbound_question(
    identity: &Identity,
    conversation_id: &str,
    question: &str,
) -> Envelope {
    build_utterance(identity, conversation_id, question)
}

/// Protocol error reply, used when an inbound body cannot be decoded or the
/// responder fails.
pub fn build_protocol_error(identity: &Identity, conversation_id: &str, text: &str) -> Envelope {
    utterance_envelope(identity, conversation_id, text, 400)
}

fn utterance_envelope(
    identity: &Identity,
    conversation_id: &str,
    text: &str,
    response_code: i64,
) -> Envelope {
    let mut event = Event {
        event_type: EVENT_UTTERANCE.to_string(),
        ..Default::default()
    };
    event.parameters.dialog_event.speaker_id = identity.speaker_id.clone();
    event.parameters.dialog_event.span.start_time = now_rfc3339();
    event.parameters.dialog_event.features.text.mime_type = MIME_TEXT_PLAIN.to_string();
    event.parameters.dialog_event.features.text.tokens = vec![Token {
        value: text.to_string(),
    }];

    let mut envelope = Envelope::default();
    envelope.ovon.conversation.id = conversation_id.to_string();
    envelope.ovon.sender.from = identity.sender_from.clone();
    envelope.ovon.response_code = response_code;
    envelope.ovon.events = vec![event];
    envelope
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
