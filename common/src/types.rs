//! 処理結果とAPIの型定義
//!
//! サーバーとクライアントで共有される型:
//! - ProcessCsvRequest / ErrorBody: `/api/process-csv` のリクエスト・エラーボディ
//! - Category / CategorizedResult: モデルが返すカテゴリ・タグ構造
//! - ProcessedResult: スキーマ判定済みの結果（構造化 or 非構造化）

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/api/process-csv` へのリクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessCsvRequest {
    pub prompt: String,
}

/// 500応答のボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// カテゴリ（名前 + タグ一覧）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub tags: Vec<String>,
}

/// スキーマに一致したモデル出力
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategorizedResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub categories: Vec<Category>,
}

/// 処理結果
///
/// モデル出力は形が保証されないため、パース後にスキーマ判定して振り分ける。
/// どちらの variant も元のJSONと同じ値にシリアライズされる。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProcessedResult {
    Categorized(CategorizedResult),
    Unstructured(Value),
}

impl ProcessedResult {
    /// JSON値をスキーマ判定して変換
    ///
    /// 再シリアライズで同じ値に戻る場合のみ `Categorized` とする
    /// （`"summary": null` などは `Unstructured` に落ちる）。
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<CategorizedResult>(value.clone()) {
            Ok(categorized) => {
                let lossless = serde_json::to_value(&categorized)
                    .map(|v| v == value)
                    .unwrap_or(false);
                if lossless {
                    ProcessedResult::Categorized(categorized)
                } else {
                    ProcessedResult::Unstructured(value)
                }
            }
            Err(_) => ProcessedResult::Unstructured(value),
        }
    }

    pub fn is_categorized(&self) -> bool {
        matches!(self, ProcessedResult::Categorized(_))
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            ProcessedResult::Categorized(c) => c.summary.as_deref(),
            ProcessedResult::Unstructured(v) => v.get("summary").and_then(Value::as_str),
        }
    }

    /// 構造化結果のカテゴリ（非構造化なら空）
    pub fn categories(&self) -> &[Category] {
        match self {
            ProcessedResult::Categorized(c) => &c.categories,
            ProcessedResult::Unstructured(_) => &[],
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ProcessedResult::Categorized(c) => {
                serde_json::to_value(c).unwrap_or(Value::Null)
            }
            ProcessedResult::Unstructured(v) => v.clone(),
        }
    }

    /// 1行JSON（再処理プロンプトに埋め込む形式）
    pub fn to_compact_json(&self) -> String {
        self.to_value().to_string()
    }

    /// 2スペースインデントJSON（表示・ダウンロード用）
    pub fn to_pretty_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
