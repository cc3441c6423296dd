use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use page_widgets::chat::{
    ChatClient, ChatMessage, ChatRequest, ChatTransport, HttpTransport, OFF_TOPIC_WARNING,
    SEND_FAILED, SendOutcome,
};
use page_widgets::config::ChatConfig;
use page_widgets::{Error, pages};

const HI_REPLY: &str =
    r#"{"response":"hi","is_relevant":true,"confidence":0.9,"context_summary":"Нова розмова"}"#;

#[derive(Debug, Clone)]
struct Captured {
    headers: HeaderMap,
    body: String,
}

#[derive(Clone)]
struct MockChat {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<Captured>>>,
}

async fn chat_handler(
    State(state): State<MockChat>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.seen.lock().unwrap().push(Captured { headers, body });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

/// Serve `/chat/` on an ephemeral port, answering every request with `body`.
async fn spawn_server(status: StatusCode, body: &str) -> (String, Arc<Mutex<Vec<Captured>>>) {
    spawn_slow_server(status, body, Duration::ZERO).await
}

/// Like [`spawn_server`], but each answer waits `delay` first.
async fn spawn_slow_server(
    status: StatusCode,
    body: &str,
    delay: Duration,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = MockChat {
        status,
        body: body.to_string(),
        delay,
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/chat/", post(chat_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn chat_on(base_url: &str, cookie: &str) -> ChatClient {
    chat_with(
        ChatConfig {
            base_url: base_url.to_string(),
            ..ChatConfig::default()
        },
        cookie,
    )
}

fn chat_with(config: ChatConfig, cookie: &str) -> ChatClient {
    let transport = Arc::new(HttpTransport::from_config(&config).unwrap());
    ChatClient::mount(&pages::chat(cookie), transport, &config).unwrap()
}

async fn send(chat: &ChatClient, text: &str) -> SendOutcome {
    chat.context().page().set_value(chat.context().input(), text);
    chat.send().await
}

#[tokio::test]
async fn relevant_reply_round_trip() {
    let (url, seen) = spawn_server(StatusCode::OK, HI_REPLY).await;
    let chat = chat_on(&url, "a=1; csrftoken=XYZ; b=2");

    assert_eq!(send(&chat, "hello").await, SendOutcome::Replied { relevant: true });
    assert_eq!(
        chat.transcript(),
        vec![ChatMessage::user("hello"), ChatMessage::assistant("hi")]
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let request: ChatRequest = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(request.message, "hello");
    assert_eq!(seen[0].headers["x-csrftoken"], "XYZ");
    assert_eq!(seen[0].headers[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn irrelevant_reply_adds_warning() {
    let (url, _) = spawn_server(
        StatusCode::OK,
        r#"{"response":"Я говорю лише про баскетбол","is_relevant":false,"confidence":0.2,"context_summary":"Обговорювали: NBA"}"#,
    )
    .await;
    let chat = chat_on(&url, "");

    assert_eq!(send(&chat, "погода?").await, SendOutcome::Replied { relevant: false });
    assert_eq!(
        chat.transcript(),
        vec![
            ChatMessage::user("погода?"),
            ChatMessage::system(OFF_TOPIC_WARNING),
            ChatMessage::assistant("Я говорю лише про баскетбол"),
        ]
    );
}

#[tokio::test]
async fn non_json_body_is_a_failure() {
    let (url, _) = spawn_server(StatusCode::OK, "<html>oops</html>").await;
    let chat = chat_on(&url, "");

    assert_eq!(send(&chat, "hello").await, SendOutcome::Failed);
    assert_eq!(
        chat.transcript(),
        vec![ChatMessage::user("hello"), ChatMessage::system(SEND_FAILED)]
    );
}

#[tokio::test]
async fn error_status_with_reply_body_still_renders() {
    for status in [StatusCode::FORBIDDEN, StatusCode::INTERNAL_SERVER_ERROR] {
        let (url, _) = spawn_server(status, HI_REPLY).await;
        let chat = chat_on(&url, "");

        assert_eq!(send(&chat, "hello").await, SendOutcome::Replied { relevant: true });
        assert_eq!(
            chat.transcript(),
            vec![ChatMessage::user("hello"), ChatMessage::assistant("hi")]
        );
    }
}

#[tokio::test]
async fn error_status_without_reply_fields_is_a_failure() {
    let (url, _) = spawn_server(StatusCode::FORBIDDEN, r#"{"detail":"CSRF"}"#).await;
    let transport = HttpTransport::new(&url, "/chat/").unwrap();

    let err = transport
        .send(
            &ChatRequest {
                message: "hello".to_string(),
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));

    let chat = chat_on(&url, "");
    assert_eq!(send(&chat, "hello").await, SendOutcome::Failed);
    assert_eq!(
        chat.transcript(),
        vec![ChatMessage::user("hello"), ChatMessage::system(SEND_FAILED)]
    );
}

#[tokio::test]
async fn slow_server_times_out_as_a_failure() {
    let (url, seen) =
        spawn_slow_server(StatusCode::OK, HI_REPLY, Duration::from_secs(3)).await;
    let chat = chat_with(
        ChatConfig {
            base_url: url,
            timeout_secs: Some(1),
            ..ChatConfig::default()
        },
        "",
    );

    assert_eq!(send(&chat, "hello").await, SendOutcome::Failed);
    assert_eq!(
        chat.transcript(),
        vec![ChatMessage::user("hello"), ChatMessage::system(SEND_FAILED)]
    );
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_cookie_omits_header() {
    let (url, seen) = spawn_server(StatusCode::OK, r#"{"response":"hi","is_relevant":true}"#).await;
    let chat = chat_on(&url, "sessionid=abc");

    send(&chat, "hello").await;

    assert!(!seen.lock().unwrap()[0].headers.contains_key("x-csrftoken"));
}

#[tokio::test]
async fn unreachable_server_is_a_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let chat = chat_on(&format!("http://{addr}"), "");

    assert_eq!(send(&chat, "hello").await, SendOutcome::Failed);
    assert_eq!(chat.transcript().len(), 2);
}

#[tokio::test]
async fn blank_input_sends_nothing() {
    let (url, seen) = spawn_server(StatusCode::OK, r#"{"response":"hi","is_relevant":true}"#).await;
    let chat = chat_on(&url, "");

    assert_eq!(send(&chat, "  ").await, SendOutcome::Skipped);
    assert!(chat.transcript().is_empty());
    assert!(seen.lock().unwrap().is_empty());
}
