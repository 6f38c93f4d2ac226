use crate::helpers::fixtures::{store, LESSON_DATE};
use crate::helpers::{date, languages, TestContext};
use daily_lesson_tts::domain::lesson::{LanguageError, LanguageStatus, RunOutcome};
use daily_lesson_tts::domain::tts::{classify, ProviderError, RetryDecision};
use daily_lesson_tts::infrastructure::repositories::{DashScopeTtsRepository, TtsRepository};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATION_PATH: &str = "/services/aigc/multimodal-generation/generation";

fn repository(server: &MockServer) -> DashScopeTtsRepository {
    DashScopeTtsRepository::new(
        "sk-test".to_string(),
        server.uri(),
        "qwen3-tts-flash".to_string(),
        "Cherry".to_string(),
    )
    .unwrap()
}

#[tokio::test]
async fn it_should_download_the_generated_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "qwen3-tts-flash",
            "input": {"text": "你好", "voice": "Cherry", "language_type": "Chinese"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "output": {"audio": {"url": format!("{}/audio/0.mp3", server.uri())}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audio/0.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xFB, 0x90, 0x00]))
        .expect(1)
        .mount(&server)
        .await;

    let audio = repository(&server)
        .synthesize("你好", "Cherry", "qwen3-tts-flash", "zh")
        .await
        .unwrap();

    assert_eq!(audio, vec![0xFF, 0xFB, 0x90, 0x00]);
}

#[tokio::test]
async fn it_should_treat_an_auth_failure_as_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "InvalidApiKey",
            "message": "Invalid API-key provided."
        })))
        .mount(&server)
        .await;

    let err = repository(&server)
        .synthesize("Hello", "Cherry", "qwen3-tts-flash", "en")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Api { status: 401, .. }));
    assert_eq!(classify(&err), RetryDecision::Fatal);
}

#[tokio::test]
async fn it_should_reject_a_response_without_audio_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "DataInspectionFailed",
            "message": "Input data may contain inappropriate content."
        })))
        .mount(&server)
        .await;

    let err = repository(&server)
        .synthesize("Hello", "Cherry", "qwen3-tts-flash", "en")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponse(ref message) if message.contains("DataInspectionFailed")));
}

#[tokio::test]
async fn it_should_not_retry_fatal_errors_in_a_full_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API-key provided."))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = TestContext::with_records(store(vec![json!({
        "date": LESSON_DATE,
        "title": {"en": "Know your fees"},
        "summary": {"en": "Small fees compound too."}
    })]))
    .await;
    let tts: Arc<dyn TtsRepository> = Arc::new(repository(&server));

    let outcome = ctx
        .service(tts, 3)
        .run(date(LESSON_DATE), &languages(&["en"]))
        .await
        .unwrap();

    let RunOutcome::Processed { reports, .. } = outcome else {
        panic!("expected a processed run");
    };
    assert!(matches!(
        reports[0].status,
        LanguageStatus::Failed(LanguageError::Synthesis(_))
    ));
    assert!(!ctx.output_dir.join(LESSON_DATE).join("en.mp3").exists());
}

#[tokio::test]
async fn it_should_retry_a_timed_out_generation_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"output": {"audio": {"url": "unused"}}}))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let repo = repository(&server)
        .with_timeout(Duration::from_millis(100))
        .unwrap();

    let err = repo
        .synthesize("Hello", "Cherry", "qwen3-tts-flash", "en")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Transport(ref e) if e.is_timeout()));
    assert_eq!(classify(&err), RetryDecision::Retryable);

    // two more attempts in a full run: one already hit the server above
    let ctx = TestContext::with_records(store(vec![json!({
        "date": LESSON_DATE,
        "title": {"en": "Mind the gap"}
    })]))
    .await;
    let outcome = ctx
        .service(Arc::new(repo), 2)
        .run(date(LESSON_DATE), &languages(&["en"]))
        .await
        .unwrap();

    let RunOutcome::Processed { reports, .. } = outcome else {
        panic!("expected a processed run");
    };
    match &reports[0].status {
        LanguageStatus::Failed(LanguageError::Synthesis(e)) => assert_eq!(e.attempts(), 2),
        other => panic!("expected a synthesis failure, got {:?}", other),
    }
}

#[tokio::test]
async fn it_should_treat_a_refused_connection_as_retryable() {
    // bind then release a port so nothing listens on it
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let repo = DashScopeTtsRepository::new(
        "sk-test".to_string(),
        format!("http://127.0.0.1:{}", port),
        "qwen3-tts-flash".to_string(),
        "Cherry".to_string(),
    )
    .unwrap();

    let err = repo
        .synthesize("Hello", "Cherry", "qwen3-tts-flash", "en")
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Transport(ref e) if e.is_connect()));
    assert_eq!(classify(&err), RetryDecision::Retryable);
}

#[tokio::test]
async fn it_should_retry_when_the_server_drops_the_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            // read the request, then hang up without answering
            let mut buf = vec![0u8; 16 * 1024];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    let repo = DashScopeTtsRepository::new(
        "sk-test".to_string(),
        format!("http://{}", addr),
        "qwen3-tts-flash".to_string(),
        "Cherry".to_string(),
    )
    .unwrap();

    let err = repo
        .synthesize("Hello", "Cherry", "qwen3-tts-flash", "en")
        .await
        .unwrap_err();
    assert_eq!(classify(&err), RetryDecision::Retryable, "{:?}", err);

    let ctx = TestContext::with_records(store(vec![json!({
        "date": LESSON_DATE,
        "title": {"en": "Mind the gap"}
    })]))
    .await;
    let outcome = ctx
        .service(Arc::new(repo), 3)
        .run(date(LESSON_DATE), &languages(&["en"]))
        .await
        .unwrap();

    assert!(outcome.has_failures());
    // one standalone call plus three attempts in the run
    assert!(accepted.load(Ordering::SeqCst) >= 4);
}
