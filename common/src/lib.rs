//! Keyword Tagger Common Library
//!
//! サーバーとクライアントで共有される型とユーティリティ

pub mod error;
pub mod parser;
pub mod prompts;
pub mod tabular;
pub mod types;

pub use error::{Error, Result};
pub use parser::{empty_object, parse_completion, strip_code_fences};
pub use prompts::{
    build_keyword_prompt, build_prompt, build_user_message, KEYWORD_PROMPT_TEMPLATE,
    SYSTEM_PROMPT,
};
pub use tabular::{flatten_keywords, parse_rows, split_rows, summarize_records, ParseMode, RowMatrix};
pub use types::{Category, CategorizedResult, ErrorBody, ProcessCsvRequest, ProcessedResult};
