//! モデル出力パーサー
//!
//! 補完テキストから ```json フェンスを除去し、JSONとしてパースする

use crate::error::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};

lazy_static::lazy_static! {
    // 開きフェンスは後続の空白ごと、閉じフェンスは先行の空白ごと除去
    static ref CODE_FENCE_RE: Regex = Regex::new(r"```json\s*|\s*```").unwrap();
}

/// ```json フェンスを除去してトリム
///
/// # Examples
/// ```
/// use keyword_tagger_common::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_RE.replace_all(text, "").trim().to_string()
}

/// 補完テキストをJSONとしてパース
///
/// 空文字（フェンス除去後）は空オブジェクトになる。
/// パース失敗は `Error::Parse` を返す（フォールバックは呼び出し側で判断）。
pub fn parse_completion(text: &str) -> Result<Value> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Ok(empty_object());
    }
    serde_json::from_str(&cleaned)
        .map_err(|e| Error::Parse(format!("補完テキストがJSONではありません: {}", e)))
}

/// 空オブジェクト `{}`
pub fn empty_object() -> Value {
    Value::Object(Map::new())
}
