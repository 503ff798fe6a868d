use crate::envelope::Event;

pub const EVENT_INVITE: &str = "invite";
pub const EVENT_UTTERANCE: &str = "utterance";

/// What an inbound envelope asks of this agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Invite,
    Utterance(String),
}

/// Scans events in order and acts on the first recognized type. The scan
/// order is a committed contract: whichever recognized type appears earliest
/// wins, even if the other recognized type appears later. Unrecognized types
/// are skipped; no match means the caller produces no reply envelope.
pub fn route(events: &[Event]) -> Option<Action> {
    for event in events {
        match event.event_type.as_str() {
            EVENT_INVITE => return Some(Action::Invite),
            EVENT_UTTERANCE => {
                let text = event
                    .parameters
                    .dialog_event
                    .features
                    .text
                    .tokens
                    .first()
                    .map(|token| token.value.clone())
                    .unwrap_or_default();
                return Some(Action::Utterance(text));
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Token;

    fn utterance(text: &str) -> Event {
        let mut event = Event {
            event_type: EVENT_UTTERANCE.to_string(),
            ..Default::default()
        };
        event.parameters.dialog_event.features.text.tokens = vec![Token {
            value: text.to_string(),
        }];
        event
    }

    fn invite() -> Event {
        Event {
            event_type: EVENT_INVITE.to_string(),
            ..Default::default()
        }
    }

    fn named(event_type: &str) -> Event {
        Event {
            event_type: event_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn first_match_wins_over_later_invite() {
        let action = route(&[utterance("x"), invite()]);
        assert_eq!(action, Some(Action::Utterance("x".to_string())));
    }

    #[test]
    fn first_match_wins_over_later_utterance() {
        let action = route(&[invite(), utterance("x")]);
        assert_eq!(action, Some(Action::Invite));
    }

    #[test]
    fn unrecognized_events_are_skipped() {
        let action = route(&[named("whisper"), named("bye"), utterance("hello")]);
        assert_eq!(action, Some(Action::Utterance("hello".to_string())));
    }

    #[test]
    fn utterance_without_tokens_routes_to_empty_text() {
        let action = route(&[named(EVENT_UTTERANCE)]);
        assert_eq!(action, Some(Action::Utterance(String::new())));
    }

    #[test]
    fn only_first_token_is_used() {
        let mut event = utterance("first");
        event
            .parameters
            .dialog_event
            .features
            .text
            .tokens
            .push(Token {
                value: "second".to_string(),
            });
        assert_eq!(
            route(&[event]),
            Some(Action::Utterance("first".to_string()))
        );
    }

    #[test]
    fn no_recognized_event_routes_to_none() {
        assert_eq!(route(&[]), None);
        assert_eq!(route(&[named("whisper")]), None);
    }
}
