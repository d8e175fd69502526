//! セッション制御のテスト
//!
//! 送信経路と通知先を差し替えて状態遷移を検証

use keyword_tagger::error::{KeywordTaggerError, Result};
use keyword_tagger::session::{
    Notification, NotificationKind, Notifier, SessionController, SessionPhase, Severity,
    SubmitOutcome, Transport, TransportReply,
};
use keyword_tagger_common::{ParseMode, ProcessCsvRequest};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::tempdir;
use tokio::sync::mpsc;

enum FakeReply {
    Chunks(Vec<std::result::Result<Vec<u8>, String>>),
    Failure(u16, Vec<u8>),
}

#[derive(Default)]
struct FakeTransport {
    replies: Mutex<VecDeque<FakeReply>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeTransport {
    fn with(replies: Vec<FakeReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].clone()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ProcessCsvRequest) -> Result<TransportReply> {
        self.prompts.lock().unwrap().push(request.prompt);
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(FakeReply::Chunks(chunks)) => {
                let (tx, rx) = mpsc::channel(chunks.len().max(1));
                for chunk in chunks {
                    tx.try_send(chunk).expect("channel has room for every chunk");
                }
                Ok(TransportReply::Stream(rx))
            }
            Some(FakeReply::Failure(status, body)) => Ok(TransportReply::Failure { status, body }),
            None => Err(KeywordTaggerError::Transport("connection refused".into())),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
    progress: Mutex<Vec<u8>>,
    loading: Mutex<Vec<bool>>,
}

impl RecordingNotifier {
    fn kinds(&self) -> Vec<NotificationKind> {
        self.notifications.lock().unwrap().iter().map(|n| n.kind).collect()
    }

    fn last(&self) -> Notification {
        self.notifications.lock().unwrap().last().cloned().expect("no notification")
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn loading(&self, is_loading: bool) {
        self.loading.lock().unwrap().push(is_loading);
    }

    fn progress(&self, value: u8) {
        self.progress.lock().unwrap().push(value);
    }
}

fn chunks(parts: &[&str]) -> FakeReply {
    FakeReply::Chunks(parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect())
}

fn controller(replies: Vec<FakeReply>) -> SessionController<FakeTransport, RecordingNotifier> {
    SessionController::init(
        FakeTransport::with(replies),
        RecordingNotifier::default(),
        ParseMode::Naive,
    )
}

const CATEGORIES_JSON: &str =
    r#"{"categories":[{"name":"Product Type","tags":["Shoes","Boots"]}]}"#;

/// CSV未読込で送信しても送信経路は呼ばれない
#[tokio::test]
async fn test_submit_without_file_is_rejected() {
    let mut session = controller(vec![chunks(&["{}"])]);

    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(session.transport().calls(), 0);
    let notification = session.notifier().last();
    assert_eq!(notification.kind, NotificationKind::NoCsvData);
    assert_eq!(notification.severity, Severity::Destructive);
    assert_eq!(notification.title, "No CSV Data");
    assert!(!session.state().is_loading);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

/// アップロード → 行列 → キーワード一覧
#[tokio::test]
async fn test_load_text_scenario() {
    let mut session = controller(vec![chunks(&[CATEGORIES_JSON])]);
    session.load_text("keywords.csv", "a,b\nc,d").unwrap();

    assert_eq!(
        session.state().rows,
        Some(vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ])
    );
    assert_eq!(session.phase(), SessionPhase::FileLoaded);
    let uploaded = session.notifier().last();
    assert_eq!(uploaded.kind, NotificationKind::Uploaded);
    assert!(uploaded.description.contains("\"keywords.csv\""));

    let prompt = session.build_prompt().unwrap();
    assert!(prompt.contains("<keyword_list>\na\nb\nc\nd\n</keyword_list>"));
}

/// ストリームを連結して結果を保存、進捗は90止まりで最後に100
#[tokio::test]
async fn test_submit_success_streams_and_stores_result() {
    let parts: Vec<&str> = CATEGORIES_JSON
        .as_bytes()
        .chunks(4)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect();
    assert!(parts.len() > 10);

    let mut session = controller(vec![chunks(&parts)]);
    session.load_text("k.csv", "running shoes\ntrail boots").unwrap();
    session.set_feedback("ignored on first pass");

    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Completed);
    let result = session.result().expect("result stored");
    assert!(result.is_categorized());
    assert_eq!(result.categories()[0].tags, vec!["Shoes", "Boots"]);

    let progress = session.notifier().progress.lock().unwrap().clone();
    assert_eq!(progress.first(), Some(&0));
    assert_eq!(progress.last(), Some(&100));
    let streaming = &progress[1..progress.len() - 1];
    assert_eq!(streaming.len(), parts.len());
    assert!(streaming.iter().all(|&v| v <= 90));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(session.state().progress.value(), 100);

    assert_eq!(*session.notifier().loading.lock().unwrap(), vec![true, false]);
    assert_eq!(session.notifier().last().kind, NotificationKind::ProcessingComplete);
    assert!(session.state().feedback.is_empty());
    assert!(session.state().processed_at.is_some());
    assert_eq!(session.phase(), SessionPhase::ResultReady);
    assert!(!session.transport().prompt(0).contains("Previous result"));
}

/// 500 + `{"error": "rate limited"}` はエラー通知になる
#[tokio::test]
async fn test_server_error_message_is_shown() {
    let body = br#"{"error":"rate limited"}"#.to_vec();
    let mut session = controller(vec![FakeReply::Failure(500, body)]);
    session.load_text("k.csv", "shoes").unwrap();
    session.set_feedback("more brands");

    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("rate limited".into()));
    let notification = session.notifier().last();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.severity, Severity::Destructive);
    assert!(notification.description.contains("rate limited"));
    assert!(!session.state().is_loading);
    assert!(session.state().feedback.is_empty());
    assert!(session.result().is_none());
}

/// エラーボディが読めない場合は汎用メッセージ
#[tokio::test]
async fn test_server_error_without_body() {
    let mut session = controller(vec![FakeReply::Failure(502, b"Bad Gateway".to_vec())]);
    session.load_text("k.csv", "shoes").unwrap();

    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Failed to process CSV".into()));
}

/// 接続失敗もエラー通知
#[tokio::test]
async fn test_transport_error() {
    let mut session = controller(vec![]);
    session.load_text("k.csv", "shoes").unwrap();

    let outcome = session.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.contains("connection refused")));
    assert_eq!(*session.notifier().loading.lock().unwrap(), vec![true, false]);
}

/// 途中でストリームが切れた場合
#[tokio::test]
async fn test_stream_chunk_error() {
    let reply = FakeReply::Chunks(vec![Ok(b"{\"categ".to_vec()), Err("connection reset".into())]);
    let mut session = controller(vec![reply]);
    session.load_text("k.csv", "shoes").unwrap();

    let outcome = session.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("connection reset".into()));
}

/// 再処理: 前回結果とフィードバックがプロンプトに入る。失敗時は前回結果を保持
#[tokio::test]
async fn test_refinement_pass() {
    let mut session = controller(vec![
        chunks(&[CATEGORIES_JSON]),
        chunks(&["not json"]),
        chunks(&[r#"{"categories":[]}"#]),
    ]);
    session.load_text("k.csv", "nike air,adidas boost").unwrap();
    assert_eq!(session.submit().await, SubmitOutcome::Completed);

    session.set_feedback("split brands");
    let outcome = session.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(session.state().feedback.is_empty());
    assert_eq!(session.result().unwrap().categories().len(), 1);

    let refined = session.transport().prompt(1);
    assert!(refined.contains(&format!("\n\nPrevious result: {}", CATEGORIES_JSON)));
    assert!(refined.contains("\n\nUser feedback: split brands\n\n"));

    // フィードバックが消えたので3回目は通常プロンプト
    assert_eq!(session.submit().await, SubmitOutcome::Completed);
    assert!(!session.transport().prompt(2).contains("Previous result"));
    assert!(session.result().unwrap().categories().is_empty());

    assert_eq!(
        session.notifier().kinds(),
        vec![
            NotificationKind::Uploaded,
            NotificationKind::ProcessingComplete,
            NotificationKind::Error,
            NotificationKind::ProcessingComplete,
        ]
    );
}

/// 結果がなければ保存しない
#[tokio::test]
async fn test_download_without_result() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = controller(vec![]);

    assert!(session.download(dir.path()).unwrap().is_none());
    assert!(!dir.path().join("result.json").exists());
    assert!(session.notifier().kinds().is_empty());
}

/// 保存した result.json は結果と同じJSON
#[tokio::test]
async fn test_download_round_trip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut session = controller(vec![chunks(&[r#"{"summary":"x","data":[]}"#])]);
    session.load_text("k.csv", "shoes").unwrap();
    session.submit().await;

    let path = session.download(dir.path()).unwrap().expect("file written");

    assert_eq!(path.file_name().unwrap(), "result.json");
    let content = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, json!({"summary": "x", "data": []}));
    assert_eq!(session.notifier().last().kind, NotificationKind::DownloadStarted);
}

/// teardown で全データ破棄
#[tokio::test]
async fn test_teardown_clears_session() {
    let mut session = controller(vec![chunks(&[CATEGORIES_JSON])]);
    session.load_text("k.csv", "shoes").unwrap();
    session.submit().await;
    session.set_feedback("draft");

    session.teardown();

    let state = session.state();
    assert!(state.file_name.is_none());
    assert!(state.rows.is_none());
    assert!(state.result.is_none());
    assert!(state.feedback.is_empty());
    assert_eq!(state.progress.value(), 0);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

/// 存在しないファイルのアップロード
#[tokio::test]
async fn test_upload_missing_file() {
    let mut session = controller(vec![]);
    let err = session
        .upload(std::path::Path::new("/nonexistent/keywords-12345.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeywordTaggerError::FileNotFound(_)));
    assert!(session.notifier().kinds().is_empty());
}

/// ファイルからのアップロード（末尾改行は空行として残る）
#[tokio::test]
async fn test_upload_from_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("keywords.csv");
    std::fs::write(&path, "running shoes\ntrail boots\n").unwrap();

    let mut session = controller(vec![]);
    session.upload(&path).await.unwrap();

    assert_eq!(session.state().file_name.as_deref(), Some("keywords.csv"));
    assert_eq!(session.state().rows.as_ref().unwrap().len(), 3);
}

/// strictモードは引用符を解釈する
#[tokio::test]
async fn test_strict_parse_mode() {
    let mut session = SessionController::init(
        FakeTransport::default(),
        RecordingNotifier::default(),
        ParseMode::Strict,
    );
    session.load_text("k.csv", "\"shoes, red\",boots\n").unwrap();

    let prompt = session.build_prompt().unwrap();
    assert!(prompt.contains("<keyword_list>\nshoes, red\nboots\n</keyword_list>"));
}
