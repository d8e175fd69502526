//! サーバーへの送信経路
//!
//! 成功応答のボディはチャンク単位でチャネルに流し、セッション側で連結する。

use crate::error::{KeywordTaggerError, Result};
use futures::StreamExt;
use keyword_tagger_common::ProcessCsvRequest;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// チャネルのバッファ数
const CHUNK_BUFFER: usize = 16;

/// ボディのチャンク（読み取り失敗はメッセージ）
pub type Chunk = std::result::Result<Vec<u8>, String>;

/// 送信結果
#[derive(Debug)]
pub enum TransportReply {
    /// 2xx: ボディをチャンクで受け取る
    Stream(mpsc::Receiver<Chunk>),
    /// 非2xx: ステータスとボディ全体
    Failure { status: u16, body: Vec<u8> },
}

pub trait Transport {
    fn send(&self, request: ProcessCsvRequest) -> impl Future<Output = Result<TransportReply>> + Send;
}

/// reqwestによるHTTP送信
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ProcessCsvRequest) -> Result<TransportReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| KeywordTaggerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?.to_vec();
            return Ok(TransportReply::Failure { status: status.as_u16(), body });
        }

        let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            while let Some(item) = stream.next().await {
                let chunk = item.map(|bytes| bytes.to_vec()).map_err(|e| e.to_string());
                let failed = chunk.is_err();
                if let Err(e) = &chunk {
                    warn!("response stream error: {}", e);
                }
                if tx.send(chunk).await.is_err() || failed {
                    break;
                }
            }
            debug!("response stream finished");
        });

        Ok(TransportReply::Stream(rx))
    }
}
