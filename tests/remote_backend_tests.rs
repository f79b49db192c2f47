//! Remote chat backend against a local HTTP listener

use book_lens::chat::{
    ChatContext, RemoteBackend, Responder, ResponsePayload, REMOTE_FAILURE_MESSAGE,
};
use book_lens::corpus::load_corpus;
use book_lens::domain::Corpus;
use rand::rngs::mock::StepRng;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn corpus() -> Corpus {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/book.json");
    load_corpus(&path).expect("fixture corpus")
}

/// Serve one request with a canned reply and hand back the request body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let endpoint = format!("http://{}/chat", listener.local_addr().expect("addr"));

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read");
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
        let length: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|v| v.trim().parse().expect("content length"))
            .unwrap_or(0);
        while buf.len() < header_end + length {
            let n = socket.read(&mut chunk).await.expect("read body");
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let reply = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(reply.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&buf[header_end..header_end + length]).into_owned()
    });

    (endpoint, handle)
}

fn context() -> ChatContext {
    ChatContext {
        current_chapter_title: "Blue Zones".to_string(),
        book_title: "Escape Velocity from Human Aging".to_string(),
        recent_messages: Vec::new(),
    }
}

#[tokio::test]
async fn remote_answer_is_used_verbatim() {
    let corpus = corpus();
    let responder = Responder::new(&corpus);
    let (endpoint, server) = serve_once("200 OK", r#"{"response": "Sleep is repair time."}"#).await;
    let backend = RemoteBackend::new(endpoint).expect("client");

    let reply = responder
        .respond("why sleep?", Some(&backend), &context(), &mut StepRng::new(0, 0))
        .await;
    assert_eq!(reply, ResponsePayload::Remote { message: "Sleep is repair time.".to_string() });

    let sent: serde_json::Value =
        serde_json::from_str(&server.await.expect("server task")).expect("request json");
    assert_eq!(sent["message"], "why sleep?");
    assert_eq!(sent["context"]["currentChapterTitle"], "Blue Zones");
    assert_eq!(sent["context"]["bookTitle"], "Escape Velocity from Human Aging");
    assert!(sent["context"]["recentMessages"].as_array().expect("messages").is_empty());
}

#[tokio::test]
async fn server_error_becomes_generic_failure() {
    let corpus = corpus();
    let responder = Responder::new(&corpus);
    let (endpoint, server) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let backend = RemoteBackend::new(endpoint).expect("client");

    let reply = responder
        .respond("what is healthspan?", Some(&backend), &context(), &mut StepRng::new(0, 0))
        .await;
    assert_eq!(reply, ResponsePayload::Failure { message: REMOTE_FAILURE_MESSAGE.to_string() });
    server.await.expect("server task");
}

#[tokio::test]
async fn malformed_body_becomes_generic_failure() {
    let corpus = corpus();
    let responder = Responder::new(&corpus);
    let (endpoint, server) = serve_once("200 OK", r#"{"answer": 42}"#).await;
    let backend = RemoteBackend::new(endpoint).expect("client");

    let reply = responder
        .respond("what is healthspan?", Some(&backend), &context(), &mut StepRng::new(0, 0))
        .await;
    assert!(matches!(reply, ResponsePayload::Failure { .. }));
    server.await.expect("server task");
}

#[tokio::test]
async fn unreachable_endpoint_is_an_error() {
    // Bind then drop so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let endpoint = format!("http://{}/chat", listener.local_addr().expect("addr"));
    drop(listener);

    let backend = RemoteBackend::new(endpoint).expect("client");
    let err = backend.ask("hello", &context()).await.expect_err("refused");
    assert!(err.to_string().contains("Remote"), "unexpected error: {err}");
}

#[tokio::test]
async fn without_backend_answers_locally() {
    let corpus = corpus();
    let responder = Responder::new(&corpus);
    let reply = responder
        .respond("What is healthspan?", None, &context(), &mut StepRng::new(0, 0))
        .await;
    let ResponsePayload::Knowledge { term, .. } = reply else {
        panic!("expected knowledge reply, got {reply:?}");
    };
    assert_eq!(term, "healthspan");
}
