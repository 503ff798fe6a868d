use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use ovon_basic_agent::config::Config;
use ovon_basic_agent::error::OvonAgentError;
use ovon_basic_agent::forwarder::Forwarder;

fn peer_reply(token: &str) -> serde_json::Value {
    json!({
        "ovon": {
            "conversation": {"id": "OvonDemo137"},
            "sender": {"from": "https://peer.example/ovontest"},
            "responseCode": 200,
            "events": [{
                "eventType": "utterance",
                "parameters": {"dialogEvent": {"features": {"text": {"tokens": [{"value": token}]}}}}
            }]
        }
    })
}

#[tokio::test]
async fn forward_wraps_the_question_and_unwraps_the_reply() {
    let server = MockServer::start_async().await;
    let peer_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ovontest")
                .header("content-type", "application/json")
                .body_contains("weather?");
            then.status(200).json_body(peer_reply("sunny"));
        })
        .await;

    let forwarder = Forwarder::from_config(&Config::default()).unwrap();
    let outcome = forwarder
        .forward(&server.url("/ovontest"), "weather?")
        .await
        .unwrap();

    assert_eq!(outcome.reply, "sunny");
    assert!(outcome.sent_json.contains("weather?"));
    assert!(outcome.sent_json.contains("textBrowser"));
    assert!(outcome.sent_json.contains("OvonDemo137"));
    assert!(outcome.received_json.contains("sunny"));
    peer_mock.assert_hits(1);
}

#[tokio::test]
async fn invite_reply_yields_an_empty_answer() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ovontest");
            then.status(200).json_body(json!({
                "ovon": {"conversation": {"id": "OvonDemo137"}, "responseCode": 200,
                         "events": [{"eventType": "invite"}]}
            }));
        })
        .await;

    let forwarder = Forwarder::from_config(&Config::default()).unwrap();
    let outcome = forwarder
        .forward(&server.url("/ovontest"), "hello?")
        .await
        .unwrap();
    assert_eq!(outcome.reply, "");
}

#[tokio::test]
async fn peer_error_status_is_a_forward_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ovontest");
            then.status(500).body("peer exploded");
        })
        .await;

    let forwarder = Forwarder::from_config(&Config::default()).unwrap();
    let err = forwarder
        .forward(&server.url("/ovontest"), "hello?")
        .await
        .unwrap_err();
    match err {
        OvonAgentError::Forward(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("peer exploded"));
        }
        other => panic!("expected forward error, got {other:?}"),
    }
}

#[tokio::test]
async fn garbled_success_body_is_a_decode_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ovontest");
            then.status(200).body("Error: not an envelope");
        })
        .await;

    let forwarder = Forwarder::from_config(&Config::default()).unwrap();
    let err = forwarder
        .forward(&server.url("/ovontest"), "hello?")
        .await
        .unwrap_err();
    assert!(matches!(err, OvonAgentError::Decode(_)));
}

#[tokio::test]
async fn unreachable_peer_is_a_forward_error() {
    let forwarder = Forwarder::from_config(&Config::default()).unwrap();
    let err = forwarder
        .forward("http://127.0.0.1:9/ovontest", "hello?")
        .await
        .unwrap_err();
    assert!(matches!(err, OvonAgentError::Forward(_)));
}
