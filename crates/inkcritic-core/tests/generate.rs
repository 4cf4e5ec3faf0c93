//! End-to-end comment generation against a mock DashScope endpoint.

use inkcritic_core::{CommentGenerator, CommentRequest, Config, FailureKind, Style};
use mockito::Matcher;
use std::time::{Duration, Instant};

const PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";

fn config_for(server: &mockito::Server, delay_ms: u64) -> Config {
    let mut config = Config::default();
    config.llm.api_key = "sk-integration".to_string();
    config.llm.endpoint = Some(format!("{}{PATH}", server.url()));
    config.llm.timeout_ms = 5_000;
    config.retry.delay_ms = delay_ms;
    config
}

#[tokio::test]
async fn generates_comment_from_block_content() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-integration")
        .match_body(Matcher::Regex("温暖鼓励".to_string()))
        .with_status(200)
        .with_body(
            r#"{"output":{"choices":[{"message":{"role":"assistant","content":[{"text":"小红的字越写越好了！"}]}}]}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let generator = CommentGenerator::from_config(&config_for(&server, 10)).unwrap();
    let request = CommentRequest::new("https://cdn.example.com/work.jpg")
        .subject("小红")
        .style(Style::Warm);

    let (comment, error, _elapsed_ms) = generator.generate(&request).await.into_parts();

    mock.assert_async().await;
    assert_eq!(comment.as_deref(), Some("小红的字越写越好了！"));
    assert_eq!(error, None);
}

#[tokio::test]
async fn retries_remote_failures_then_surfaces_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body(r#"{"code":"InternalError","message":"rate limited"}"#)
        .expect(3)
        .create_async()
        .await;

    let generator = CommentGenerator::from_config(&config_for(&server, 25)).unwrap();
    let start = Instant::now();
    let outcome = generator
        .generate(&CommentRequest::new("https://cdn.example.com/work.jpg"))
        .await;

    mock.assert_async().await;
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(outcome.failure_kind(), Some(FailureKind::RemoteService));
    assert_eq!(outcome.elapsed_ms(), 0);
    assert!(outcome.error().unwrap().contains("rate limited"));
}

#[tokio::test]
async fn unreadable_image_yields_generic_message_without_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .expect(0)
        .create_async()
        .await;

    let generator = CommentGenerator::from_config(&config_for(&server, 1)).unwrap();
    let outcome = generator
        .generate(&CommentRequest::new("/nonexistent/works/ghost.jpg"))
        .await;

    mock.assert_async().await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::Transport));
    assert!(!outcome.error().unwrap().contains("ghost.jpg"));
}

#[tokio::test]
async fn missing_key_never_contacts_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .expect(0)
        .create_async()
        .await;

    let mut config = config_for(&server, 1);
    config.llm.api_key = String::new();
    let generator = CommentGenerator::from_config(&config).unwrap();
    let outcome = generator
        .generate(&CommentRequest::new("https://cdn.example.com/work.jpg"))
        .await;

    mock.assert_async().await;
    assert_eq!(outcome.failure_kind(), Some(FailureKind::Configuration));
    assert_eq!(outcome.error(), Some("API Key 未配置"));
}
