//! CSVキーワードをLLMでカテゴリ・タグに分類するツール
//!
//! - server: `/api/process-csv` エンドポイント（補完クライアントのラッパー）
//! - session: アップロードから再処理・保存までのセッション制御
//! - render / console / interactive: 端末向けの表示と対話

pub mod cli;
pub mod completion;
pub mod config;
pub mod console;
pub mod download;
pub mod error;
pub mod interactive;
pub mod render;
pub mod server;
pub mod session;
