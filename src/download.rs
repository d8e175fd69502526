//! 結果JSONの保存

use crate::error::Result;
use keyword_tagger_common::ProcessedResult;
use std::path::{Path, PathBuf};

/// 保存ファイル名
pub const DOWNLOAD_FILE_NAME: &str = "result.json";

/// `dir/result.json` に2スペースインデントで書き出す
pub fn write_result_json(result: &ProcessedResult, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    let content = result.to_pretty_json()?;
    std::fs::write(&path, content)?;
    Ok(path)
}
