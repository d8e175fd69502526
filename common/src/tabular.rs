//! CSVテキストの行列化とキーワード抽出
//!
//! - split_rows: アップロード時の単純分割（改行→カンマ、引用符は解釈しない）
//! - parse_rows_strict: csvクレートによる厳密パース
//! - flatten_keywords: 行列を平坦化して空セルを除去
//! - summarize_records: ヘッダー付きCSVのプレビュー要約

use crate::error::Result;
use serde_json::{json, Map, Value};

/// 行列（行 × セル）
pub type RowMatrix = Vec<Vec<String>>;

/// 行列化の方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// 改行・カンマで単純分割（デフォルト）
    #[default]
    Naive,
    /// csvクレートで引用符・エスケープを解釈
    Strict,
}

/// 単純分割
///
/// N行のテキストは必ずN行になる（末尾の空行も `[""]` として残る）。
/// 各セルは前後の空白を除去する。先頭のBOMは捨てる。
pub fn split_rows(text: &str) -> RowMatrix {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.split('\n')
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect()
}

/// csvクレートによる厳密パース
///
/// ヘッダー行なし・列数不揃い許容・前後空白除去。
pub fn parse_rows_strict(text: &str) -> Result<RowMatrix> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

pub fn parse_rows(text: &str, mode: ParseMode) -> Result<RowMatrix> {
    match mode {
        ParseMode::Naive => Ok(split_rows(text)),
        ParseMode::Strict => parse_rows_strict(text),
    }
}

/// 行優先で平坦化し、空セルを除去（重複はそのまま）
pub fn flatten_keywords(rows: &[Vec<String>]) -> Vec<String> {
    rows.iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .cloned()
        .collect()
}

/// ヘッダー付きCSVを読み、件数要約とレコード一覧を返す
///
/// 出力形式: `{"summary": "...", "data": [{"列名": "値"}, ...]}`
pub fn summarize_records(text: &str, prompt: &str) -> Result<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut data = Vec::new();

    for record in reader.records() {
        let record = record?;
        let mut row = Map::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(value.to_string()));
        }
        data.push(Value::Object(row));
    }

    let summary = format!(
        "Processed {} rows based on prompt: \"{}\"",
        data.len(),
        prompt
    );

    Ok(json!({ "summary": summary, "data": data }))
}
