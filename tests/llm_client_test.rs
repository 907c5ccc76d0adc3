// OpenAI-compatible client wire tests against a local mock server
use mockito::Matcher;
use skillgraph::llm::client::LlmClient;
use skillgraph::llm::client_impl::OpenAIClient;

fn completion_body(text: &str) -> String {
    format!(
        r#"{{"choices": [{{"message": {{"role": "assistant", "content": "{}"}}}}]}}"#,
        text
    )
}

#[tokio::test]
async fn test_complete_returns_message_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("Two solid paragraphs."))
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url(
        "test-key".to_string(),
        "llama-3.3-70b-versatile".to_string(),
        server.url(),
        2048,
        10,
    )
    .unwrap();

    let text = client.complete("prompt").await.unwrap();
    assert_eq!(text, "Two solid paragraphs.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_key_sends_no_authorization_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion_body("ok"))
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url(
        String::new(),
        "local-model".to_string(),
        server.url(),
        1024,
        10,
    )
    .unwrap();

    client.complete("prompt").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": "rate limited"}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url(
        "k".to_string(),
        "m".to_string(),
        server.url(),
        1024,
        10,
    )
    .unwrap();

    let err = client.complete("prompt").await.unwrap_err();
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn test_malformed_response_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"unexpected": true}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url(
        "k".to_string(),
        "m".to_string(),
        server.url(),
        1024,
        10,
    )
    .unwrap();

    assert!(client.complete("prompt").await.is_err());
}
