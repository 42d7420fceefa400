//! End-to-end integration tests for the thoughtloop agent.
//!
//! These tests exercise the full pipeline from configuration to answer:
//! provider construction, HTTP transport against a local mock server,
//! directive parsing, and the built-in tools.

use futures::StreamExt;
use serde_json::json;
use thoughtloop_agent::AgentService;
use thoughtloop_config::{AppConfig, Transport};
use thoughtloop_core::message::{Message, Role};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ──────────────────────────────────────────────────────────────

fn chat_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-e2e",
        "model": "e2e-model",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 20, "completion_tokens": 8, "total_tokens": 28}
    })
}

fn responses_body(text: &str) -> serde_json::Value {
    json!({
        "id": "resp-e2e",
        "model": "e2e-model",
        "output": [{
            "type": "message",
            "role": "assistant",
            "content": [{"type": "output_text", "text": text}]
        }],
        "usage": {"input_tokens": 20, "output_tokens": 8, "total_tokens": 28}
    })
}

/// Mount one reply per call, served in order.
async fn script(server: &MockServer, endpoint: &str, bodies: Vec<serde_json::Value>) {
    for body in bodies {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }
}

fn config(base_url: String, transport: Transport) -> AppConfig {
    AppConfig {
        base_url: Some(base_url),
        model_id: Some("e2e-model".into()),
        transport,
        ..AppConfig::default()
    }
}

fn service(config: &AppConfig) -> AgentService {
    let provider = thoughtloop_providers::build_from_config(config).unwrap();
    AgentService::new(provider, config.model_id.clone().unwrap())
        .with_config(config)
        .with_tools(thoughtloop_tools::default_registry)
}

async fn request_bodies(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

// ── Chat completions ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_chat_completions_price_and_reviews() {
    let server = MockServer::start().await;
    script(
        &server,
        "/v1/chat/completions",
        vec![
            chat_body("Thought: price first.\nAction: search_price(\"Lenovo\")\nPAUSE"),
            chat_body("Thought: now reviews.\nAction: search_reviews(\"Lenovo\")\nPAUSE"),
            chat_body("Answer: A Lenovo laptop costs $400 and the reviews are good."),
        ],
    )
    .await;

    let config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    let outcome = service(&config)
        .agent()
        .run("How much does a Lenovo laptop cost and what are the reviews?")
        .await;

    assert_eq!(
        outcome.answer.as_deref(),
        Some("A Lenovo laptop costs $400 and the reviews are good.")
    );
    assert_eq!(outcome.turns, 3);
    assert_eq!(outcome.tool_calls, 2);

    let bodies = request_bodies(&server).await;
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0]["model"], "e2e-model");
    assert_eq!(bodies[0]["messages"].as_array().unwrap().len(), 2);
    assert_eq!(bodies[0]["messages"][0]["role"], "system");

    let last = bodies[2]["messages"].as_array().unwrap();
    assert_eq!(last.len(), 6);
    assert_eq!(last[3]["role"], "user");
    assert_eq!(last[3]["content"], "Observation: Price of Lenovo is $400");
    assert_eq!(last[5]["content"], "Observation: Reviews of Lenovo are good");
}

#[tokio::test]
async fn e2e_service_run_reshapes_messages() {
    let server = MockServer::start().await;
    script(
        &server,
        "/v1/chat/completions",
        vec![
            chat_body("Action: search_price('Lenovo')"),
            chat_body("Answer: $400"),
        ],
    )
    .await;

    let config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    let output = service(&config)
        .run(vec![Message::user("How much is a Lenovo?")])
        .await;

    assert_eq!(output.finish_reason, "stop");
    assert_eq!(
        output.messages,
        vec![Message::user("How much is a Lenovo?"), Message::assistant("$400")]
    );
}

#[tokio::test]
async fn e2e_unknown_tool_stops_after_one_call() {
    let server = MockServer::start().await;
    script(
        &server,
        "/v1/chat/completions",
        vec![chat_body("Action: ghost()\nPAUSE"), chat_body("Answer: unreachable")],
    )
    .await;

    let config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    let outcome = service(&config).agent().run("Summon a ghost").await;

    assert_eq!(outcome.answer, None);
    assert_eq!(request_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn e2e_server_error_is_no_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    let output = service(&config).run(vec![Message::user("price?")]).await;

    assert_eq!(output.messages[1], Message::assistant(""));
}

#[tokio::test]
async fn e2e_turn_ceiling_with_reprompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("thinking...")))
        .expect(3)
        .mount(&server)
        .await;

    let mut config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    config.max_turns = 3;
    config.freeform_reply = thoughtloop_config::FreeformReply::Reprompt;

    let outcome = service(&config).agent().run("Keep thinking").await;

    assert_eq!(outcome.answer, None);
    assert_eq!(outcome.turns, 3);
}

// ── Other transports ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_llama_stack_transport() {
    let server = MockServer::start().await;
    script(
        &server,
        "/v1/openai/v1/chat/completions",
        vec![
            chat_body("Action: search_reviews(\"Dell XPS\")\nPAUSE"),
            chat_body("Answer: Reviews of Dell XPS are good"),
        ],
    )
    .await;

    let config = config(server.uri(), Transport::LlamaStack);
    let outcome = service(&config).agent().run("Are Dell XPS reviews good?").await;

    assert_eq!(outcome.answer.as_deref(), Some("Reviews of Dell XPS are good"));
    assert_eq!(outcome.tool_calls, 1);
}

#[tokio::test]
async fn e2e_responses_transport() {
    let server = MockServer::start().await;
    script(
        &server,
        "/v1/responses",
        vec![
            responses_body("Action: search_price(\"Lenovo\")\nPAUSE"),
            responses_body("Answer: $400"),
        ],
    )
    .await;

    let config = config(server.uri(), Transport::Responses);
    let outcome = service(&config).agent().run("How much is a Lenovo?").await;

    assert_eq!(outcome.answer.as_deref(), Some("$400"));

    let bodies = request_bodies(&server).await;
    assert!(bodies[0]["instructions"].as_str().unwrap().contains("search_price"));
    assert!(bodies[0].get("temperature").is_none());

    let input = bodies[1]["input"].as_array().unwrap();
    assert_eq!(input.len(), 3);
    assert_eq!(input[1]["role"], "assistant");
    assert_eq!(input[1]["content"][0]["type"], "output_text");
    assert_eq!(input[2]["content"][0]["type"], "input_text");
    assert_eq!(input[2]["content"][0]["text"], "Observation: Price of Lenovo is $400");
}

// ── Service payloads ─────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_generate_stream_single_chunk() {
    let server = MockServer::start().await;
    script(&server, "/v1/chat/completions", vec![chat_body("Answer: $400")]).await;

    let config = config(format!("{}/v1", server.uri()), Transport::ChatCompletions);
    let service = service(&config);
    let chunks: Vec<_> = service
        .generate_stream(json!({"messages": [{"role": "user", "content": "price?"}]}))
        .collect()
        .await;

    assert_eq!(chunks.len(), 1);
    let chunk = chunks.into_iter().next().unwrap().unwrap();
    assert_eq!(chunk.choices[0].delta.role, Role::Assistant);
    assert_eq!(chunk.choices[0].delta.content, "$400");
    assert_eq!(chunk.choices[0].finish_reason, None);
}
