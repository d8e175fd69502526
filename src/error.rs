use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeywordTaggerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。環境変数 OPENAI_API_KEY か `keyword-tagger config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    /// プロバイダーが返したエラーメッセージ（そのまま利用者に見せる）
    #[error("{0}")]
    Provider(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("{0}")]
    Transport(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] keyword_tagger_common::Error),
}

pub type Result<T> = std::result::Result<T, KeywordTaggerError>;
