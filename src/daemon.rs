use std::future::Future;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Form, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, CONTENT_TYPE, ORIGIN,
        },
        HeaderMap, Method, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::builder;
use crate::config::Config;
use crate::envelope::{self, Envelope};
use crate::error::{OvonAgentError, Result};
use crate::forwarder::Forwarder;
use crate::responder::{EchoResponder, Responder};
use crate::router::{self, Action};

// The reference protocol echoes the singular form back on preflight.
const ACCESS_CONTROL_ALLOW_METHOD: &str = "access-control-allow-method";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub responder: Arc<dyn Responder>,
    pub forwarder: Arc<Forwarder>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BrowserForm {
    agenturl: String,
    question: String,
    dispjson: String,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ovontest", any(ovon_endpoint))
        .route("/getresponse", any(browser_page))
        .route("/", any(alive))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn alive(method: Method) -> String {
    format!("basic agent is alive.\nRequest method is: {method}")
}

#[derive(Debug, PartialEq, Eq)]
enum RequestClass {
    Preflight,
    Data,
}

/// A request is a cross-origin preflight probe only when all three signals
/// are present; an OPTIONS without an Origin is handled as data.
fn classify(method: &Method, headers: &HeaderMap) -> RequestClass {
    let has_origin = headers
        .get(ORIGIN)
        .is_some_and(|value| !value.as_bytes().is_empty());
    let has_requested_method = headers
        .get(ACCESS_CONTROL_REQUEST_METHOD)
        .is_some_and(|value| !value.as_bytes().is_empty());
    if *method == Method::OPTIONS && has_origin && has_requested_method {
        RequestClass::Preflight
    } else {
        RequestClass::Data
    }
}

async fn ovon_endpoint(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match classify(&method, &headers) {
        RequestClass::Preflight => preflight_response(&headers),
        RequestClass::Data => data_response(&state, &body).await,
    }
}

/// 204 acknowledgment echoing the requested method and headers back as the
/// allowed ones. The reference wrote a "preflight" body here as well, but a
/// 204 never delivers one; the allow headers are the operative payload.
fn preflight_response(headers: &HeaderMap) -> Response {
    tracing::debug!("preflight probe acknowledged");
    let mut response = Response::builder().status(StatusCode::NO_CONTENT);
    if let Some(requested_method) = headers.get(ACCESS_CONTROL_REQUEST_METHOD) {
        response = response.header(ACCESS_CONTROL_ALLOW_METHOD, requested_method.clone());
    }
    if let Some(requested_headers) = headers.get(ACCESS_CONTROL_REQUEST_HEADERS) {
        response = response.header(ACCESS_CONTROL_ALLOW_HEADERS, requested_headers.clone());
    }
    response.body(Body::empty()).unwrap()
}

async fn data_response(state: &AppState, body: &[u8]) -> Response {
    let inbound = match envelope::decode(body) {
        Ok(inbound) => inbound,
        Err(err) => {
            tracing::warn!(error = %err, "rejecting undecodable inbound envelope");
            let out = builder::build_protocol_error(
                &state.config.agent_identity(),
                "",
                &err.to_string(),
            );
            return envelope_response(StatusCode::BAD_REQUEST, &out);
        }
    };

    let conversation_id = inbound.ovon.conversation.id.clone();
    match router::route(&inbound.ovon.events) {
        Some(Action::Invite) => {
            tracing::info!(conversation = %conversation_id, "answering invite");
            let out = builder::build_invite(&state.config.agent_identity(), &conversation_id);
            envelope_response(StatusCode::OK, &out)
        }
        Some(Action::Utterance(text)) => match state.responder.respond(&text).await {
            Ok(reply) => {
                tracing::info!(conversation = %conversation_id, "answering utterance");
                let out = builder::build_utterance(
                    &state.config.agent_identity(),
                    &conversation_id,
                    &reply,
                );
                envelope_response(StatusCode::OK, &out)
            }
            Err(err) => {
                tracing::warn!(error = %err, "responder failed");
                let out = builder::build_protocol_error(
                    &state.config.agent_identity(),
                    &conversation_id,
                    &err.to_string(),
                );
                envelope_response(StatusCode::INTERNAL_SERVER_ERROR, &out)
            }
        },
        // The reference writes no reply for unrecognized events; an empty
        // 200 is the closest HTTP rendering of that contract.
        None => {
            tracing::debug!(conversation = %conversation_id, "no recognized event, empty reply");
            Response::builder()
                .status(StatusCode::OK)
                .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
                .body(Body::empty())
                .unwrap()
        }
    }
}

fn envelope_response(status: StatusCode, out: &Envelope) -> Response {
    match envelope::encode(out) {
        Ok(bytes) => Response::builder()
            .status(status)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .body(Body::from(bytes))
            .unwrap(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Browser-facing page: forwards the submitted question to the named peer
/// agent and renders the reply, plus the exchanged JSON on request.
async fn browser_page(State(state): State<AppState>, Form(form): Form<BrowserForm>) -> Html<String> {
    let mut reply = String::new();
    let mut sent_json = String::new();
    let mut received_json = String::new();

    if !form.agenturl.trim().is_empty() {
        match state.forwarder.forward(&form.agenturl, &form.question).await {
            Ok(outcome) => {
                reply = outcome.reply;
                sent_json = outcome.sent_json;
                received_json = outcome.received_json;
            }
            Err(err) => {
                tracing::warn!(peer = %form.agenturl, error = %err, "forward failed");
                reply = err.to_string();
            }
        }
    }

    Html(render_browser_page(
        &form,
        &reply,
        &sent_json,
        &received_json,
    ))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn render_browser_page(
    form: &BrowserForm,
    reply: &str,
    sent_json: &str,
    received_json: &str,
) -> String {
    // Interpolated values are caller-controlled; escape them so a reply or
    // question cannot inject markup into the page.
    let reply = escape_html(reply);
    let json_panels = if form.dispjson.contains("yes") {
        format!(
            "<div class='json'><u>JSON sent to agent</u><br>{sent}</div>\
             <div class='json'><u>JSON received from agent</u><br>{received}</div>",
            sent = escape_html(sent_json),
            received = escape_html(received_json),
        )
    } else {
        String::new()
    };

    format!(
        "<!DOCTYPE html><html><head><title>OVON Agent Browser</title>\
<style type='text/css'>\
span#art{{font-size:30px;font-weight:bold;font-family:sans-serif;color:red;padding-left:30px;}}\
div#intro{{width:60%;margin-left:20px;padding:10px;font-family:sans-serif;}}\
form#reqform{{width:100%;margin-left:30px;margin-top:10px;margin-bottom:10px;}}\
div.json{{width:75%;background-color:#faeecd;margin:10px 0 10px 20px;padding:10px;}}\
div#agentresp{{width:75%;margin-left:20px;padding:10px;font-family:sans-serif;border:1px solid;}}\
</style></head><body>\
<span id='art'>OVON Agent Browser</span>\
<div id='intro'>Enter the URL of an OVON-message compliant agent, then enter the \
message/question that you would like to send to the agent.<br> The response from \
the agent will be shown below.<br> Tick the 'Show JSON' box to display the JSON \
messages sent to, and received from the agent.</div>\
<form id='reqform' action='/getresponse' method='post' enctype='application/x-www-form-urlencoded'>\
<label for='agenturl'>Agent URL:</label><br>\
<input type='text' id='agenturl' name='agenturl' value='{agenturl}' size='50'><br>\
<label for='question'>Enter your question:</label><br>\
<textarea id='question' name='question' rows='4' cols='80'>{question}</textarea><br><br>\
<input type='checkbox' id='dispjson' name='dispjson' value='yes'>\
<label for='dispjson'> Show JSON</label><br><br>\
<input type='submit' value='Submit your question to the Agent'>\
</form>\
<div id='agentresp'>{reply}</div>\
{json_panels}\
</body></html>",
        agenturl = escape_html(&form.agenturl),
        question = escape_html(&form.question),
    )
}

pub async fn run(host: &str, port: u16, config: Config) -> Result<()> {
    run_with_shutdown(host, port, config, futures::future::pending::<()>()).await
}

pub async fn run_with_shutdown<F>(host: &str, port: u16, config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let forwarder = Forwarder::from_config(&config)?;
    let state = AppState {
        config: Arc::new(config),
        responder: Arc::new(EchoResponder),
        forwarder: Arc::new(forwarder),
    };
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OvonAgentError::Runtime(e.to_string()))?;
    tracing::info!(%addr, "ovon basic agent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| OvonAgentError::Runtime(e.to_string()))?;

    Ok(())
}
