use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use stockline_ai::{
    HttpOracle, HttpOracleConfig, Oracle, OracleError, OracleRequest, StaticOracle,
    TranslatorConfig,
};
use stockline_api::app::services::ControlPlaneServices;
use stockline_infra::HttpStockLedger;
use stockline_inventory::{InMemoryStockLedger, StockSeed};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: axum::Router) -> Self {
        // Same routers as prod, bound to an ephemeral port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn inventory() -> Self {
        let ledger = Arc::new(InMemoryStockLedger::new(StockSeed::default()));
        Self::spawn(stockline_api::app::build_inventory_app(ledger)).await
    }

    /// Control plane wired to a running inventory service through HTTP.
    async fn control_plane(inventory: &TestServer, oracle: Arc<dyn Oracle>) -> Self {
        let ledger = HttpStockLedger::new(
            format!("{}/inventory", inventory.base_url),
            Duration::from_secs(5),
        )
        .unwrap();
        let services = ControlPlaneServices::new(
            oracle,
            Arc::new(ledger),
            TranslatorConfig {
                timeout: Duration::from_millis(500),
                ..TranslatorConfig::default()
            },
        );
        Self::spawn(stockline_api::app::build_control_plane_app(Arc::new(services))).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Oracle double standing in for a model that follows the prompt's verb rules.
struct ScriptedOracle;

#[async_trait]
impl Oracle for ScriptedOracle {
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        let text = request.user.to_lowercase();
        let reply = match text.as_str() {
            "i bought 3 pants" | "i borrowed 2 pants" => {
                let n = if text.contains('3') { 3 } else { 2 };
                format!(r#"{{"method": "POST", "json": {{"item": "pants", "change": {n}}}}}"#)
            }
            "i gave away 2 tshirts" => {
                "```json\n{\"method\": \"POST\", \"json\": {\"item\": \"tshirts\", \"change\": -2}}\n```"
                    .to_string()
            }
            "i sold 100 pants" => {
                r#"{"method": "POST", "json": {"item": "pants", "change": -100}}"#.to_string()
            }
            "i bought 2 shoes" => {
                r#"{"method": "POST", "json": {"item": "shoes", "change": 2}}"#.to_string()
            }
            "i received -2 pants" => {
                r#"{"method": "POST", "json": {"item": "pants", "change": -2}}"#.to_string()
            }
            t if t.contains("how many") => {
                "Here is the request you need: {\"method\": \"GET\"}".to_string()
            }
            t if t.contains("shoes") => r#"{"method": "ERROR", "message": "Could not understand the query. Please mention tshirts or pants clearly."}"#.to_string(),
            _ => "I'm not sure what you mean.".to_string(),
        };
        Ok(reply)
    }
}

struct HungOracle;

#[async_trait]
impl Oracle for HungOracle {
    async fn complete(&self, _request: OracleRequest) -> Result<String, OracleError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(String::new())
    }
}

async fn query(client: &reqwest::Client, srv: &TestServer, text: &str) -> reqwest::Response {
    client
        .post(format!("{}/query", srv.base_url))
        .json(&json!({ "user_query": text }))
        .send()
        .await
        .unwrap()
}

async fn inventory_snapshot(client: &reqwest::Client, srv: &TestServer) -> serde_json::Value {
    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    for srv in [&inventory, &cp] {
        let res = client.get(format!("{}/health", srv.base_url)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn inventory_get_returns_seed() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let body = inventory_snapshot(&client, &srv).await;
    assert_eq!(body, json!({"tshirts": 20, "pants": 15}));
}

#[tokio::test]
async fn inventory_post_adjusts_and_reads_back() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/inventory", srv.base_url))
        .json(&json!({"item": "tshirts", "change": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"tshirts": 25, "pants": 15}));

    let res = client
        .post(format!("{}/inventory", srv.base_url))
        .json(&json!({"item": "PANTS", "change": -2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(
        inventory_snapshot(&client, &srv).await,
        json!({"tshirts": 25, "pants": 13})
    );
}

#[tokio::test]
async fn inventory_rejects_invalid_item() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/inventory", srv.base_url))
        .json(&json!({"item": "shoes", "change": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid item: shoes");
    assert_eq!(body["error"], "invalid_item");
}

#[tokio::test]
async fn inventory_rejects_overdraw_without_mutation() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/inventory", srv.base_url))
        .json(&json!({"item": "pants", "change": -20}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Insufficient stock: only 15 pants left");

    assert_eq!(inventory_snapshot(&client, &srv).await["pants"], 15);
}

#[tokio::test]
async fn inventory_rejects_malformed_body() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/inventory", srv.base_url))
        .json(&json!({"item": "pants"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn inventory_allows_cross_origin_callers() {
    let srv = TestServer::inventory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/inventory", srv.base_url))
        .header("Origin", "http://example.test")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn query_acquisition_verb_adds_stock() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "I bought 3 pants").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["pants"], 18);

    let res = query(&client, &cp, "I borrowed 2 pants").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(inventory_snapshot(&client, &inventory).await["pants"], 20);
}

#[tokio::test]
async fn query_disposal_verb_removes_stock() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "I gave away 2 tshirts").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"tshirts": 18, "pants": 15}));
}

#[tokio::test]
async fn query_stock_check_returns_everything() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "How many tshirts and pants do I have?").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"tshirts": 20, "pants": 15}));
}

#[tokio::test]
async fn query_unknown_item_is_client_error() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "Do I have any shoes?").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().to_lowercase().contains("could not"));

    let res = query(&client, &cp, "I bought 2 shoes").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid item: shoes");
}

#[tokio::test]
async fn query_gibberish_is_unparseable_and_leaves_stock() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "asdfghjk").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unparseable_query");
    assert!(body["detail"].as_str().unwrap().to_lowercase().contains("could not"));

    assert_eq!(
        inventory_snapshot(&client, &inventory).await,
        json!({"tshirts": 20, "pants": 15})
    );
}

#[tokio::test]
async fn query_overdraw_propagates_ledger_error() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "I sold 100 pants").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["detail"], "Insufficient stock: only 15 pants left");
}

#[tokio::test]
async fn query_negative_received_is_success_or_client_error() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "I received -2 pants").await;
    assert!([StatusCode::OK, StatusCode::BAD_REQUEST].contains(&res.status()));
}

#[tokio::test]
async fn query_oracle_timeout_is_server_error() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(HungOracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "How many pants?").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "oracle_failure");
}

#[tokio::test]
async fn query_with_ledger_down_is_server_error() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(
        &inventory,
        Arc::new(StaticOracle::new(r#"{"method": "GET"}"#)),
    )
    .await;
    drop(inventory);
    // Give the aborted listener a moment to close.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let res = query(&client, &cp, "How many pants?").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn query_rejects_malformed_body() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/query", cp.base_url))
        .json(&json!({"text": "I bought 3 pants"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn both_services_publish_openapi() {
    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(ScriptedOracle)).await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/openapi.json", inventory.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = res.json().await.unwrap();
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/inventory"]["get"].is_object());
    assert!(doc["paths"]["/inventory"]["post"].is_object());
    assert!(doc["components"]["schemas"]["ChangeRequest"]["properties"]["change"].is_object());
    assert!(doc["components"]["schemas"]["ErrorBody"]["properties"]["detail"].is_object());

    let res = client.get(format!("{}/openapi.json", cp.base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc: serde_json::Value = res.json().await.unwrap();
    assert!(doc["paths"]["/query"]["post"].is_object());
    assert!(doc["paths"]["/inventory"].is_null());
    let required = doc["components"]["schemas"]["QueryRequest"]["required"]
        .as_array()
        .unwrap();
    assert!(required.contains(&json!("user_query")));
}

/// Requests seen by the chat-completions stand-in: authorization header and body.
type SeenRequests = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

/// Plays a hosted chat-completions endpoint with a fixed status and body.
async fn chat_endpoint(
    status: StatusCode,
    reply: serde_json::Value,
    delay: Duration,
) -> (TestServer, SeenRequests) {
    let seen: SeenRequests = Arc::default();
    let recorder = seen.clone();

    let app = axum::Router::new().route(
        "/v1/chat/completions",
        axum::routing::post(
            move |headers: axum::http::HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorder.lock().unwrap().push((auth, body));
                    tokio::time::sleep(delay).await;
                    (status, axum::Json(reply))
                }
            },
        ),
    );

    (TestServer::spawn(app).await, seen)
}

fn http_oracle(endpoint: &TestServer, timeout: Duration) -> HttpOracle {
    HttpOracle::new(HttpOracleConfig {
        endpoint: format!("{}/v1/chat/completions", endpoint.base_url),
        api_key: Some("sk-test".to_string()),
        timeout,
    })
    .unwrap()
}

fn chat_reply(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn http_oracle_sends_chat_request_and_reads_reply() {
    let (endpoint, seen) = chat_endpoint(
        StatusCode::OK,
        chat_reply(json!("```json\n{\"method\": \"GET\"}\n```")),
        Duration::ZERO,
    )
    .await;
    let inventory = TestServer::inventory().await;
    let oracle = http_oracle(&endpoint, Duration::from_secs(2));
    let cp = TestServer::control_plane(&inventory, Arc::new(oracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "How many pants do I have?").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, json!({"tshirts": 20, "pants": 15}));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (auth, request) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(request["model"], "gpt-3.5-turbo");
    assert_eq!(request["temperature"], 0.0);
    assert_eq!(request["messages"][0]["role"], "system");
    assert_eq!(request["messages"][1]["role"], "user");
    assert_eq!(request["messages"][1]["content"], "How many pants do I have?");
}

#[tokio::test]
async fn http_oracle_rejection_is_server_error_without_upstream_body() {
    let (endpoint, _) = chat_endpoint(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided: sk-te****"}}),
        Duration::ZERO,
    )
    .await;

    let oracle = http_oracle(&endpoint, Duration::from_secs(2));
    let err = oracle
        .complete(OracleRequest {
            system: "rules".to_string(),
            user: "How many pants?".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::Status { status: 401, .. }));

    let inventory = TestServer::inventory().await;
    let cp = TestServer::control_plane(&inventory, Arc::new(oracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "How many pants?").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "oracle_failure");
    assert!(!body["detail"].as_str().unwrap().contains("Incorrect API key"));
}

#[tokio::test]
async fn http_oracle_without_text_content_is_server_error() {
    let (endpoint, _) =
        chat_endpoint(StatusCode::OK, chat_reply(serde_json::Value::Null), Duration::ZERO).await;
    let inventory = TestServer::inventory().await;
    let oracle = http_oracle(&endpoint, Duration::from_secs(2));
    let cp = TestServer::control_plane(&inventory, Arc::new(oracle)).await;
    let client = reqwest::Client::new();

    let res = query(&client, &cp, "How many pants?").await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "oracle_failure");
    assert_eq!(inventory_snapshot(&client, &inventory).await["pants"], 15);
}

#[tokio::test]
async fn http_oracle_slow_reply_times_out() {
    let (endpoint, _) = chat_endpoint(
        StatusCode::OK,
        chat_reply(json!("{\"method\": \"GET\"}")),
        Duration::from_secs(5),
    )
    .await;

    let oracle = http_oracle(&endpoint, Duration::from_millis(200));
    let err = oracle
        .complete(OracleRequest {
            system: "rules".to_string(),
            user: "How many pants?".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err, OracleError::Timeout(200));
}
