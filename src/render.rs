//! 結果表示
//!
//! 処理中はスケルトン、それ以外は整形済みJSONを表示する。
//! ダウンロードは処理中のみ無効。

use crate::session::SessionState;
use keyword_tagger_common::ProcessedResult;

/// スケルトンの各行の幅
const SKELETON_WIDTHS: [usize; 5] = [25, 20, 15, 30, 25];

pub const DOWNLOAD_LABEL: &str = "Download JSON";
pub const PROCESSING_LABEL: &str = "Processing...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub body: String,
    pub download_label: &'static str,
    pub download_enabled: bool,
}

pub fn render_result(result: &ProcessedResult, is_loading: bool) -> ResultView {
    if is_loading {
        return ResultView {
            body: skeleton(),
            download_label: PROCESSING_LABEL,
            download_enabled: false,
        };
    }

    let body = result
        .to_pretty_json()
        .unwrap_or_else(|e| format!("<表示できません: {}>", e));

    ResultView {
        body,
        download_label: DOWNLOAD_LABEL,
        download_enabled: true,
    }
}

fn skeleton() -> String {
    SKELETON_WIDTHS
        .iter()
        .map(|&width| "░".repeat(width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// カテゴリ・タグの一覧表示（構造化結果のみ）
pub fn render_categories(result: &ProcessedResult) -> Option<String> {
    if !result.is_categorized() {
        return None;
    }

    let mut out = String::new();
    if let Some(summary) = result.summary() {
        out.push_str(summary);
        out.push_str("\n\n");
    }
    for category in result.categories() {
        out.push_str(&format!("■ {} ({})\n", category.name, category.tags.len()));
        for tag in &category.tags {
            out.push_str(&format!("  - {}\n", tag));
        }
    }
    Some(out)
}

/// 送信ボタンの表示名
pub fn submit_label(state: &SessionState) -> &'static str {
    if state.is_loading {
        PROCESSING_LABEL
    } else if state.result.is_some() {
        "Process Again"
    } else {
        "Process CSV"
    }
}
