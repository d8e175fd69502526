use anyhow::Context;
use clap::Parser;
use keyword_tagger::{cli, completion, config, console, interactive, server, session};
use keyword_tagger_common::{summarize_records, ParseMode};
use cli::{Cli, Commands};
use completion::{CompletionClient, OpenAiProvider};
use config::Config;
use console::ConsoleNotifier;
use session::{HttpTransport, SessionController, SubmitOutcome};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let is_server = matches!(cli.command, Commands::Serve { .. });
    setup_tracing(cli.verbose, is_server)?;
    let config = Config::load().context("設定ファイルの読み込みに失敗")?;
    let parse_mode = ParseMode::from(cli.csv_parser);

    match cli.command {
        Commands::Serve { bind } => {
            let api_key = config.get_api_key()?;
            let bind = bind.unwrap_or_else(|| config.bind_addr.clone());

            println!("🚀 keyword-tagger - サーバー起動\n");
            println!("  モデル: {}", config.model);

            let provider = OpenAiProvider::new(api_key, config.api_base_url.clone());
            let client = CompletionClient::new(provider, config.model.clone());
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("{} で待受できません", bind))?;
            println!("✔ http://{}{}\n", listener.local_addr()?, server::PROCESS_CSV_PATH);

            server::serve(listener, client).await?;
        }

        Commands::Process { csv, output, server } => {
            println!("🏷  keyword-tagger - キーワード分類\n");

            let endpoint = endpoint_for(&config, server);
            let mut controller =
                SessionController::init(HttpTransport::new(endpoint), ConsoleNotifier::new(), parse_mode);

            println!("[1/3] CSVを読み込み中...");
            controller.upload(&csv).await?;

            println!("[2/3] AI処理中...");
            let outcome = controller.submit().await;
            if let SubmitOutcome::Failed(message) = outcome {
                controller.teardown();
                anyhow::bail!("処理に失敗しました: {}", message);
            }

            println!("[3/3] 結果を保存中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            if let Some(path) = controller.download(&output_dir)? {
                println!("✔ 結果を保存: {}", path.display());
            }
            controller.teardown();

            println!("\n✅ 完了");
        }

        Commands::Session { csv, server, output } => {
            let endpoint = endpoint_for(&config, server);
            let mut controller =
                SessionController::init(HttpTransport::new(endpoint), ConsoleNotifier::new(), parse_mode);
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));

            interactive::run_interactive_session(&mut controller, csv.as_deref(), &output_dir).await?;
        }

        Commands::Preview { csv, prompt } => {
            let text = std::fs::read_to_string(&csv)
                .with_context(|| format!("read {}", csv.display()))?;
            let summary = summarize_records(&text, &prompt)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  API URL: {}", config.api_base_url);
                println!("  待受アドレス: {}", config.bind_addr);
                println!("  サーバーURL: {}", config.server_url);
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_ok() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn endpoint_for(config: &Config, server: Option<String>) -> String {
    match server {
        Some(url) => Config { server_url: url, ..config.clone() }.process_endpoint(),
        None => config.process_endpoint(),
    }
}

fn setup_tracing(verbose: bool, is_server: bool) -> anyhow::Result<()> {
    // クライアント側はプログレスバーを崩さないよう警告以上のみ
    let default_level = match (verbose, is_server) {
        (true, _) => "keyword_tagger=debug,info",
        (false, true) => "info",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("ログ初期化に失敗")?;
    Ok(())
}
