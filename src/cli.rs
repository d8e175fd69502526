use clap::{Parser, Subcommand, ValueEnum};
use keyword_tagger_common::ParseMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyword-tagger")]
#[command(about = "CSVキーワードをLLMでカテゴリ・タグに分類するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// CSVの読み方 (naive/strict)
    #[arg(long, value_enum, default_value = "naive", global = true)]
    pub csv_parser: CsvParser,
}

#[derive(Subcommand)]
pub enum Commands {
    /// `/api/process-csv` サーバーを起動
    Serve {
        /// 待受アドレス（省略時は設定値）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// CSVを1回処理して result.json を出力
    Process {
        /// キーワードCSVファイル
        #[arg(required = true)]
        csv: PathBuf,

        /// 出力ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// サーバーURL（省略時は設定値）
        #[arg(short, long)]
        server: Option<String>,
    },

    /// 対話的に処理・再処理・保存
    Session {
        /// キーワードCSVファイル（省略時は対話で入力）
        csv: Option<PathBuf>,

        /// サーバーURL（省略時は設定値）
        #[arg(short, long)]
        server: Option<String>,

        /// result.json の保存先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// CSVをヘッダー付きで読み、件数とレコードを表示（APIは呼ばない）
    Preview {
        /// CSVファイル
        #[arg(required = true)]
        csv: PathBuf,

        /// 要約に含めるプロンプト
        #[arg(short, long, default_value = "")]
        prompt: String,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CsvParser {
    /// 改行・カンマで単純分割
    Naive,
    /// 引用符・エスケープを解釈
    Strict,
}

impl From<CsvParser> for ParseMode {
    fn from(parser: CsvParser) -> Self {
        match parser {
            CsvParser::Naive => ParseMode::Naive,
            CsvParser::Strict => ParseMode::Strict,
        }
    }
}
