//! 補完クライアント
//!
//! プロンプトをシステム+ユーザーの2メッセージに組み立ててモデルへ送り、
//! 返ってきたテキストから ```json フェンスを除去してJSONにする。
//!
//! モデル本体は `CompletionProvider` トレイトの向こう側にあり、
//! 実装は `openai::OpenAiProvider`（テストでは固定応答のスタブ）。

mod openai;

pub use openai::OpenAiProvider;

use crate::error::Result;
use keyword_tagger_common::{build_user_message, empty_object, parse_completion, SYSTEM_PROMPT};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, info, warn};

/// 会話メッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// 補完リクエスト
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub n: u32,
}

/// 外部モデルとの境界
pub trait CompletionProvider: Send + Sync + 'static {
    /// 1件の補完を取得（本文なしは `None`）
    fn complete(&self, request: &ChatRequest) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// プロンプト → JSON の往復を担当
pub struct CompletionClient<P> {
    provider: P,
    model: String,
}

impl<P: CompletionProvider> CompletionClient<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self { provider, model: model.into() }
    }

    /// 2メッセージの会話を組み立てる（temperature 0, 1件）
    pub fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_user_message(prompt)),
            ],
            temperature: 0.0,
            n: 1,
        }
    }

    /// プロンプトを処理してJSONを返す
    ///
    /// 本文が空、またはJSONとして読めない場合は `{}` を返す。
    /// プロバイダー側のエラーは `Err` のまま返す。
    pub async fn process(&self, prompt: &str) -> Result<Value> {
        info!("Received prompt length: {}", prompt.chars().count());

        let request = self.build_request(prompt);
        let completion = self.provider.complete(&request).await?;
        let text = completion.unwrap_or_default();
        debug!("completion length: {}", text.len());

        match parse_completion(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("{}; falling back to empty object", e);
                Ok(empty_object())
            }
        }
    }
}
