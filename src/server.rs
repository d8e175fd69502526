//! `/api/process-csv` HTTPサーバー
//!
//! リクエストボディ `{"prompt": "..."}` を補完クライアントに渡し、
//! 成功時はモデル出力のJSONをそのまま200で、失敗時は `{"error": "..."}` を500で返す。

use crate::completion::{CompletionClient, CompletionProvider};
use crate::error::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use keyword_tagger_common::{ErrorBody, ProcessCsvRequest};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

pub const PROCESS_CSV_PATH: &str = "/api/process-csv";

/// ルーターを構築
pub fn router<P: CompletionProvider>(client: CompletionClient<P>) -> Router {
    Router::new()
        .route(PROCESS_CSV_PATH, post(process_csv::<P>))
        .with_state(Arc::new(client))
}

/// 待受を開始（終了しない）
pub async fn serve<P: CompletionProvider>(listener: TcpListener, client: CompletionClient<P>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("listening on http://{}{}", addr, PROCESS_CSV_PATH);
    axum::serve(listener, router(client)).await?;
    Ok(())
}

async fn process_csv<P: CompletionProvider>(
    State(client): State<Arc<CompletionClient<P>>>,
    body: Bytes,
) -> Response {
    // Json extractorは4xxで拒否するため自前でパースする
    let request: ProcessCsvRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(format!("Invalid request body: {}", e)),
    };

    match client.process(&request.prompt).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(e.to_string()),
    }
}

fn error_response(message: String) -> Response {
    error!("Error processing CSV: {}", message);
    let message = if message.is_empty() {
        "Failed to process CSV".to_string()
    } else {
        message
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: message })).into_response()
}
