//! セッション制御
//!
//! アップロード → プロンプト生成 → 送信 → 結果保存 → フィードバック付き再処理、
//! の流れを1つのセッションオブジェクトで管理する。
//!
//! 状態は `SessionController` だけが変更し、すべての変更は `&mut self` 経由。
//! 送信中に次の送信が走ることはない。

pub mod notifier;
pub mod progress;
pub mod transport;

pub use notifier::{Notification, NotificationKind, Notifier, Severity};
pub use progress::ProgressEstimate;
pub use transport::{HttpTransport, Transport, TransportReply};

use crate::download;
use crate::error::{KeywordTaggerError, Result};
use chrono::{DateTime, Local};
use keyword_tagger_common::{
    build_prompt, flatten_keywords, parse_rows, ErrorBody, ParseMode, ProcessCsvRequest,
    ProcessedResult, RowMatrix,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// セッションの段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    FileLoaded,
    Processing,
    ResultReady,
}

/// セッション状態
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub file_name: Option<String>,
    pub rows: Option<RowMatrix>,
    pub result: Option<ProcessedResult>,
    pub is_loading: bool,
    pub progress: ProgressEstimate,
    pub feedback: String,
    /// 最後に結果を受け取った時刻
    pub processed_at: Option<DateTime<Local>>,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Processing
        } else if self.result.is_some() {
            SessionPhase::ResultReady
        } else if self.rows.is_some() {
            SessionPhase::FileLoaded
        } else {
            SessionPhase::Idle
        }
    }
}

/// 送信の結末
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 送信せずに終了（CSV未読込）
    Rejected,
    Completed,
    Failed(String),
}

pub struct SessionController<T, N> {
    state: SessionState,
    transport: T,
    notifier: N,
    parse_mode: ParseMode,
}

impl<T: Transport, N: Notifier> SessionController<T, N> {
    /// 空のセッションを開始
    pub fn init(transport: T, notifier: N, parse_mode: ParseMode) -> Self {
        Self {
            state: SessionState::default(),
            transport,
            notifier,
            parse_mode,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn result(&self) -> Option<&ProcessedResult> {
        self.state.result.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// ファイルを読み込んで行列化
    pub async fn upload(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(KeywordTaggerError::FileNotFound(path.display().to_string()));
        }
        let text = tokio::fs::read_to_string(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.load_text(&file_name, &text)
    }

    /// 読み込み済みテキストを行列化して保持
    pub fn load_text(&mut self, file_name: &str, text: &str) -> Result<()> {
        let rows = parse_rows(text, self.parse_mode)?;
        info!("loaded {} rows from {}", rows.len(), file_name);

        self.state.rows = Some(rows);
        self.state.file_name = Some(file_name.to_string());
        self.notifier.notify(Notification::uploaded(file_name));
        Ok(())
    }

    pub fn set_feedback(&mut self, feedback: impl Into<String>) {
        self.state.feedback = feedback.into();
    }

    /// 現在の状態から送信するプロンプトを組み立てる
    pub fn build_prompt(&self) -> Option<String> {
        let rows = self.state.rows.as_ref()?;
        let keywords = flatten_keywords(rows);
        let previous = self.state.result.as_ref().map(ProcessedResult::to_value);
        Some(build_prompt(&keywords, previous.as_ref(), &self.state.feedback))
    }

    /// 送信（初回・再処理とも）
    ///
    /// 成否にかかわらず最後に処理中フラグとフィードバックを消す。
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(prompt) = self.build_prompt() else {
            self.notifier.notify(Notification::no_csv_data());
            return SubmitOutcome::Rejected;
        };

        self.state.is_loading = true;
        self.state.progress.reset();
        self.notifier.loading(true);
        self.notifier.progress(0);
        debug!("Constructed prompt: {}", prompt);

        let outcome = match self.run_submit(prompt).await {
            Ok(result) => {
                self.state.result = Some(result);
                self.state.processed_at = Some(Local::now());
                let value = self.state.progress.complete();
                self.notifier.progress(value);
                self.notifier.notify(Notification::processing_complete());
                SubmitOutcome::Completed
            }
            Err(e) => {
                error!("Error processing CSV: {}", e);
                let message = e.to_string();
                self.notifier.notify(Notification::error(&message));
                SubmitOutcome::Failed(message)
            }
        };

        self.state.is_loading = false;
        self.state.feedback.clear();
        self.notifier.loading(false);
        outcome
    }

    async fn run_submit(&mut self, prompt: String) -> Result<ProcessedResult> {
        let reply = self.transport.send(ProcessCsvRequest { prompt }).await?;

        let mut rx = match reply {
            TransportReply::Stream(rx) => rx,
            TransportReply::Failure { status, body } => {
                let message = serde_json::from_slice::<ErrorBody>(&body)
                    .map(|b| b.error)
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Failed to process CSV".to_string());
                debug!("server responded {}: {}", status, message);
                return Err(KeywordTaggerError::Transport(message));
            }
        };

        let mut accumulated = Vec::new();
        while let Some(chunk) = rx.recv().await {
            let bytes = chunk.map_err(KeywordTaggerError::Transport)?;
            accumulated.extend_from_slice(&bytes);
            let value = self.state.progress.advance();
            self.notifier.progress(value);
        }

        let text = String::from_utf8_lossy(&accumulated);
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(ProcessedResult::from_value(value))
    }

    /// 結果を `dir/result.json` に保存（結果がなければ何もしない）
    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(result) = self.state.result.as_ref() else {
            return Ok(None);
        };
        let path = download::write_result_json(result, dir)?;
        self.notifier.notify(Notification::download_started());
        Ok(Some(path))
    }

    /// セッションデータをすべて破棄
    pub fn teardown(&mut self) {
        if let Some(name) = self.state.file_name.as_deref() {
            debug!("purging session data for {}", name);
        }
        self.state = SessionState::default();
    }
}
