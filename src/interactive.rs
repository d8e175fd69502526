//! 対話式セッション
//!
//! 処理結果を表示し、フィードバック付き再処理・保存・終了を選ばせる。

use crate::error::{KeywordTaggerError, Result};
use crate::render::{render_categories, render_result, submit_label};
use crate::session::{Notifier, SessionController, SessionPhase, SubmitOutcome, Transport};
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// フィードバックを付けて再処理
    Refine(String),
    /// フィードバックなしで再処理
    ProcessAgain,
    /// result.json を保存
    Download,
    /// 終了
    Quit,
}

/// 対話ループを実行
pub async fn run_interactive_session<T: Transport, N: Notifier>(
    controller: &mut SessionController<T, N>,
    csv: Option<&Path>,
    output_dir: &Path,
) -> Result<()> {
    let csv_path = match csv {
        Some(path) => path.to_path_buf(),
        None => prompt_csv_path()?,
    };
    controller.upload(&csv_path).await?;

    println!("📄 {}行を読み込みました", controller.state().rows.as_ref().map_or(0, Vec::len));
    println!("[{}]", submit_label(controller.state()));
    controller.submit().await;

    loop {
        show_result(controller);

        let action = prompt_session_action(controller.phase())?;
        match action {
            SessionAction::Refine(feedback) => {
                controller.set_feedback(feedback);
                println!("[{}]", submit_label(controller.state()));
                if let SubmitOutcome::Failed(message) = controller.submit().await {
                    println!("  → 前回の結果を保持します ({})", message);
                }
            }
            SessionAction::ProcessAgain => {
                println!("[{}]", submit_label(controller.state()));
                controller.submit().await;
            }
            SessionAction::Download => match controller.download(output_dir)? {
                Some(path) => println!("✔ 保存: {}", path.display()),
                None => println!("保存する結果がありません"),
            },
            SessionAction::Quit => break,
        }
    }

    controller.teardown();
    println!("\n✅ セッション終了");
    Ok(())
}

fn show_result<T: Transport, N: Notifier>(controller: &SessionController<T, N>) {
    let state = controller.state();
    let Some(result) = state.result.as_ref() else {
        return;
    };

    println!("\n--- Processing Result ---");
    if let Some(at) = state.processed_at {
        println!("({})", at.format("%Y-%m-%d %H:%M:%S"));
    }
    match render_categories(result) {
        Some(listing) => print!("{}", listing),
        None => println!("{}", render_result(result, state.is_loading).body),
    }
    println!("-------------------------\n");
}

fn prompt_csv_path() -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt("CSVファイルのパス")
        .interact_text()
        .map_err(dialog_error)?;
    Ok(PathBuf::from(input.trim()))
}

fn prompt_session_action(phase: SessionPhase) -> Result<SessionAction> {
    let has_result = phase == SessionPhase::ResultReady;
    let items: &[&str] = if has_result {
        &["フィードバックして再処理", "そのまま再処理", "result.json を保存", "終了"]
    } else {
        &["再処理", "終了"]
    };

    let selection = Select::new()
        .with_prompt("操作を選択")
        .items(items)
        .default(0)
        .interact()
        .map_err(dialog_error)?;

    let action = match (has_result, selection) {
        (true, 0) => {
            let feedback: String = Input::new()
                .with_prompt("フィードバック")
                .allow_empty(true)
                .interact_text()
                .map_err(dialog_error)?;
            SessionAction::Refine(feedback)
        }
        (true, 1) | (false, 0) => SessionAction::ProcessAgain,
        (true, 2) => SessionAction::Download,
        _ => SessionAction::Quit,
    };
    Ok(action)
}

fn dialog_error(e: dialoguer::Error) -> KeywordTaggerError {
    KeywordTaggerError::Io(std::io::Error::other(e.to_string()))
}
