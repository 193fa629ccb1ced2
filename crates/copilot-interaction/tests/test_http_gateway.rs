use copilot_core::config::ClientConfig;
use copilot_core::conversation::UploadedFile;
use copilot_core::gateway::BackendGateway;
use copilot_interaction::HttpBackendGateway;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> HttpBackendGateway {
    let config = ClientConfig {
        host: "localhost".to_string(),
        local_base_url: server.uri(),
        request_timeout_secs: 5,
        ..Default::default()
    };
    HttpBackendGateway::new(config).expect("client should build")
}

#[tokio::test]
async fn test_list_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-files/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": ["a.py", "b.rs"]})))
        .expect(1)
        .mount(&server)
        .await;

    let files = gateway_for(&server).list_files().await.unwrap();
    assert_eq!(files, vec!["a.py".to_string(), "b.rs".to_string()]);
}

#[tokio::test]
async fn test_list_conversations() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/list-conversations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"conversations": ["c-1"]})))
        .mount(&server)
        .await;

    let ids = gateway_for(&server).list_conversations().await.unwrap();
    assert_eq!(ids, vec!["c-1".to_string()]);
}

#[tokio::test]
async fn test_chat_sends_null_id_for_new_conversation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "hello", "conversation_id": null})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "hi there", "conversation_id": "c-42"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = gateway_for(&server).chat("hello", None).await.unwrap();
    assert_eq!(reply.response, "hi there");
    assert_eq!(reply.conversation_id, "c-42");
}

#[tokio::test]
async fn test_chat_forwards_existing_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "again", "conversation_id": "c-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "ok", "conversation_id": "c-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = gateway_for(&server).chat("again", Some("c-1")).await.unwrap();
    assert_eq!(reply.conversation_id, "c-1");
}

#[tokio::test]
async fn test_rag_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rag-query/"))
        .and(body_json(json!({"question": "File: a.py\nwhat?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "it parses"})))
        .mount(&server)
        .await;

    let answer = gateway_for(&server)
        .rag_query("File: a.py\nwhat?")
        .await
        .unwrap();
    assert_eq!(answer.answer, "it parses");
}

#[tokio::test]
async fn test_run_task_sends_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run_task"))
        .and(body_string_contains("name=\"model\""))
        .and(body_string_contains("groq"))
        .and(body_string_contains("name=\"task\""))
        .and(body_string_contains("summarize"))
        .and(body_string_contains("filename=\"main.rs\""))
        .and(body_string_contains("fn main() {}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "A tiny program"})))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadedFile::new("main.rs", b"fn main() {}".to_vec());
    let output = gateway_for(&server)
        .run_task("groq", "summarize", &file)
        .await
        .unwrap();
    assert_eq!(output.output.as_deref(), Some("A tiny program"));
}

#[tokio::test]
async fn test_run_task_without_output_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/run_task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "done"})))
        .mount(&server)
        .await;

    let file = UploadedFile::new("notes.txt", b"hello".to_vec());
    let output = gateway_for(&server)
        .run_task("groq", "summarize", &file)
        .await
        .unwrap();
    assert!(output.output.is_none());
    assert_eq!(output.display_text(), r#"{"status":"done"}"#);
}

#[tokio::test]
async fn test_non_success_status_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rag-query/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).rag_query("q").await.unwrap_err();
    assert!(err.is_network());
    assert!(matches!(
        err,
        copilot_core::CopilotError::Network { status: Some(500), .. }
    ));
}

#[tokio::test]
async fn test_unexpected_shape_is_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "wrong field"})))
        .mount(&server)
        .await;

    let err = gateway_for(&server).chat("hi", None).await.unwrap_err();
    assert!(err.is_malformed_response());
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let config = ClientConfig {
        local_base_url: "http://127.0.0.1:1".to_string(),
        request_timeout_secs: 2,
        ..Default::default()
    };
    let gateway = HttpBackendGateway::new(config).unwrap();

    let err = gateway.list_files().await.unwrap_err();
    assert!(matches!(
        err,
        copilot_core::CopilotError::Network { status: None, .. }
    ));
}
