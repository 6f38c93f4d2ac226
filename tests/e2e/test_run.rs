use crate::helpers::fixtures::{chinese_only_record, lesson_record, store, LESSON_DATE};
use crate::helpers::tts_mocks::{mock_audio_bytes, Failure, ScriptedTtsRepository};
use crate::helpers::{date, languages, TestContext};
use daily_lesson_tts::domain::lesson::{LanguageError, LanguageStatus, RunOutcome};
use daily_lesson_tts::domain::tts::RetryDecision;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn expected_audio(texts: &[&str]) -> Vec<u8> {
    texts.iter().flat_map(|text| mock_audio_bytes(text)).collect()
}

#[tokio::test]
async fn it_should_report_no_entry_without_calling_the_provider() {
    let ctx = TestContext::with_records(store(vec![json!({
        "date": "2024-01-01",
        "title": "New year"
    })]))
    .await;
    let tts = Arc::new(ScriptedTtsRepository::new());

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date("2024-01-02"), &languages(&["zh", "en"]))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NoEntry { .. }));
    assert!(!outcome.has_failures());
    assert_eq!(tts.call_count(), 0);
    assert!(!ctx.output_dir.exists());
}

#[tokio::test]
async fn it_should_treat_a_missing_store_as_no_entry() {
    let ctx = TestContext::without_store();
    let tts = Arc::new(ScriptedTtsRepository::new());

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["zh"]))
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::NoEntry { .. }));
    assert_eq!(tts.call_count(), 0);
}

#[tokio::test]
async fn it_should_write_one_file_per_language_in_reading_order() {
    let ctx = TestContext::with_records(store(vec![lesson_record()])).await;
    let tts = Arc::new(ScriptedTtsRepository::new());

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["zh", "en"]))
        .await
        .unwrap();

    assert!(!outcome.has_failures());

    let english = [
        "The power of compounding",
        "Compounding lets returns earn returns. The earlier you start, the more time works for you.",
        "Start early",
        "Stay patient",
        "Today's exercise",
        "Project your balance ten years out",
        "Past returns do not guarantee future results.",
    ];
    let en_path = ctx.output_dir.join(LESSON_DATE).join("en.mp3");
    assert_eq!(tokio::fs::read(&en_path).await.unwrap(), expected_audio(&english));
    assert!(ctx.output_dir.join(LESSON_DATE).join("zh.mp3").exists());

    let calls = tts.calls();
    assert_eq!(calls.len(), 14);
    assert!(calls[..7].iter().all(|call| call.language == "zh"));
    assert_eq!(calls[7].text, "The power of compounding");
}

#[tokio::test]
async fn it_should_retry_a_reset_connection_until_the_segment_succeeds() {
    let ctx = TestContext::with_records(store(vec![json!({
        "date": LESSON_DATE,
        "title": {"en": "Rebalance once a year"}
    })]))
    .await;
    let tts = Arc::new(
        ScriptedTtsRepository::new().fail_text("Rebalance once a year", Failure::ConnectionReset, 2),
    );

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["en"]))
        .await
        .unwrap();

    let RunOutcome::Processed { reports, .. } = outcome else {
        panic!("expected a processed run");
    };
    assert_eq!(reports[0].segment_count, 1);
    assert!(matches!(reports[0].status, LanguageStatus::Written(_)));
    assert_eq!(tts.call_count(), 3);

    let written = tokio::fs::read(ctx.output_dir.join(LESSON_DATE).join("en.mp3"))
        .await
        .unwrap();
    assert_eq!(written, mock_audio_bytes("Rebalance once a year"));
}

#[tokio::test]
async fn it_should_give_up_after_the_configured_attempts() {
    let ctx = TestContext::with_records(store(vec![lesson_record()])).await;
    let tts = Arc::new(
        ScriptedTtsRepository::new().fail_text("Start early", Failure::ConnectionReset, 10),
    );

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["en"]))
        .await
        .unwrap();

    let RunOutcome::Processed { reports, .. } = &outcome else {
        panic!("expected a processed run");
    };
    match &reports[0].status {
        LanguageStatus::Failed(LanguageError::Synthesis(e)) => {
            assert_eq!(e.segment_index(), 2);
            assert_eq!(e.attempts(), 3);
        }
        other => panic!("expected a synthesis failure, got {:?}", other),
    }
    assert!(outcome.has_failures());

    let start_early_calls = tts
        .calls()
        .iter()
        .filter(|call| call.text == "Start early")
        .count();
    assert_eq!(start_early_calls, 3);
    assert!(!ctx.output_dir.join(LESSON_DATE).join("en.mp3").exists());
}

#[tokio::test]
async fn it_should_keep_going_when_one_language_fails() {
    let ctx = TestContext::with_records(store(vec![lesson_record()])).await;
    let tts = Arc::new(ScriptedTtsRepository::new().fail_language("en", Failure::InvalidApiKey));

    let outcome = ctx
        .service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["zh", "en", "es"]))
        .await
        .unwrap();

    let RunOutcome::Processed { reports, .. } = &outcome else {
        panic!("expected a processed run");
    };
    assert!(matches!(reports[0].status, LanguageStatus::Written(_)));
    match &reports[1].status {
        LanguageStatus::Failed(LanguageError::Synthesis(e)) => {
            assert_eq!(e.segment_index(), 0);
            assert_eq!(e.attempts(), 1);
            assert!(e.to_string().contains(&RetryDecision::Fatal.to_string()));
        }
        other => panic!("expected a synthesis failure, got {:?}", other),
    }
    assert!(matches!(reports[2].status, LanguageStatus::Written(_)));
    assert!(outcome.has_failures());

    let lesson_dir = ctx.output_dir.join(LESSON_DATE);
    assert!(!lesson_dir.join("en.mp3").exists());
    assert!(!lesson_dir.join("en.mp3.partial").exists());
    // es has no text of its own and is rendered from the Chinese fallback
    assert_eq!(
        tokio::fs::read(lesson_dir.join("es.mp3")).await.unwrap(),
        tokio::fs::read(lesson_dir.join("zh.mp3")).await.unwrap()
    );
}

#[tokio::test]
async fn it_should_fall_back_to_chinese_for_missing_languages() {
    let ctx = TestContext::with_records(store(vec![chinese_only_record()])).await;
    let tts = Arc::new(ScriptedTtsRepository::new());

    ctx.service(tts.clone(), 3)
        .run(date(LESSON_DATE), &languages(&["es"]))
        .await
        .unwrap();

    let texts: Vec<String> = tts.calls().into_iter().map(|call| call.text).collect();
    assert_eq!(texts, vec!["分散投资", "不要把鸡蛋放在一个篮子里。"]);
    assert!(tts.calls().iter().all(|call| call.language == "es"));
}
