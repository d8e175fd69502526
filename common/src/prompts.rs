//! プロンプト生成モジュール
//!
//! サーバーとクライアントで共有されるプロンプト生成ロジック:
//! - KEYWORD_PROMPT_TEMPLATE: キーワード分類の指示テンプレート
//! - build_prompt: キーワード埋め込み + 再処理用フィードバック追記
//! - SYSTEM_PROMPT / build_user_message: モデルへ送る2メッセージ

use serde_json::Value;

/// キーワード一覧の差し込み位置
pub const KEYWORD_LIST_PLACEHOLDER: &str = "{{KEYWORD_LIST}}";

/// システムメッセージ
pub const SYSTEM_PROMPT: &str = "You are a CSV data processor.";

/// ユーザーメッセージ末尾に付けるJSON出力指示
pub const JSON_ONLY_INSTRUCTION: &str =
    "Please respond with only valid JSON without any markdown formatting.";

/// キーワード分類テンプレート
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"You are an AI assistant tasked with analyzing a list of keywords to generate a final set of categories and corresponding tags. 

Your goal is to group keywords into common categories and create a consolidated list of tags under each category. Follow these instructions carefully to complete the task.

First, here is the list of keywords you will be working with:

<keyword_list>
{{KEYWORD_LIST}}
</keyword_list>

Your task is to identify common categories that represent these keywords, and within each category, assign relevant tags that best describe the keywords. 

The objective is to generate a final list of categories and corresponding tags based on the patterns and themes in the keyword set.

Follow these steps to complete the task:

1. Scan the Keyword List: Carefully review all the keywords provided. Identify common patterns, themes, and terms that appear frequently.

2. Generate Categories: Define the most appropriate categories to group the keywords. Some possible categories include:
   - Product Type
   - Feature
   - Target Audience
   - Intent
   - Benefit
   - Problem
   - Brand
   - Location
   - Time
   
You are not limited to these categories and should create additional ones as needed based on the keyword list.

It's better if you explore and find more categories.

5. Prepare the Output: Organize your final list of categories and tags in the following JSON format:

{
  "categories": [
    {
      "name": "Category Name",
      "tags": ["Tag1", "Tag2", "Tag3"]
    },
    {
      "name": "Another Category",
      "tags": ["TagA", "TagB", "TagC"]
    }
  ]
}

Additional guidelines:
- Ensure that tags are concise, clear, and relevant to their category.
- Avoid overly broad or vague tags that could apply to multiple categories.
- If you encounter branded terms, create a separate "Brand" category for them.
- For location-specific keywords, consider creating a "Location" category if there are enough relevant terms.

Remember, the goal is to create a useful, well-organized categorization that accurately represents the themes and patterns in the provided keyword list."#;

/// キーワード一覧をテンプレートに差し込む
///
/// 改行区切りで最初のプレースホルダーのみ置換する。件数の上限はない。
pub fn build_keyword_prompt(keywords: &[String]) -> String {
    let keyword_list = keywords.join("\n");
    KEYWORD_PROMPT_TEMPLATE.replacen(KEYWORD_LIST_PLACEHOLDER, &keyword_list, 1)
}

/// 再処理用のコンテキストを追記
pub fn append_refinement(prompt: &str, previous: &Value, feedback: &str) -> String {
    format!(
        "{prompt}\n\nPrevious result: {previous}\n\nUser feedback: {feedback}\n\n\
         Please consider the previous result and the user's feedback when generating the new result."
    )
}

/// プロンプト生成
///
/// 前回結果があり、かつフィードバックが空でない場合のみ再処理コンテキストを付ける。
///
/// # Arguments
/// * `keywords` - 平坦化済みキーワード一覧
/// * `previous` - 前回の結果（JSON）
/// * `feedback` - ユーザーフィードバック
pub fn build_prompt(keywords: &[String], previous: Option<&Value>, feedback: &str) -> String {
    let prompt = build_keyword_prompt(keywords);
    match previous {
        Some(previous) if !feedback.is_empty() => append_refinement(&prompt, previous, feedback),
        _ => prompt,
    }
}

/// ユーザーメッセージ（プロンプト + JSON出力指示）
pub fn build_user_message(prompt: &str) -> String {
    format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
}
