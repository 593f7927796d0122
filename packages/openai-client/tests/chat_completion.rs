use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new("test-key").with_base_url(format!("{}/v1", server.uri()))
}

#[tokio::test]
async fn chat_completion_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gemini-2.5-flash-lite",
            "stream": false,
            "messages": [{"role": "user", "content": "Find the price"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gemini-2.5-flash-lite",
            "choices": [{"message": {"role": "assistant", "content": "| Price |\n|---|\n| $10 |"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20}
        })))
        .mount(&server)
        .await;

    let response = client_for(&server)
        .chat_completion(
            ChatRequest::new("gemini-2.5-flash-lite").message(Message::user("Find the price")),
        )
        .await
        .expect("completion ok");

    assert_eq!(response.content, "| Price |\n|---|\n| $10 |");
    assert_eq!(response.model.as_deref(), Some("gemini-2.5-flash-lite"));
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(20));
}

#[tokio::test]
async fn null_content_becomes_empty_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .complete("qwen/qwen3-next-80b-a3b-instruct", "hi")
        .await
        .expect("completion ok");

    assert_eq!(text, "");
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "model `nope` does not exist"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("nope", "hi")
        .await
        .expect_err("should fail");

    match err {
        OpenAIError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "model `nope` does not exist");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("m", "hi").await.unwrap_err();
    assert!(matches!(err, OpenAIError::EmptyChoices));
}
