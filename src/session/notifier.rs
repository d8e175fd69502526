//! 利用者への通知

/// 通知の重要度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// 通知の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Uploaded,
    NoCsvData,
    ProcessingComplete,
    Error,
    DownloadStarted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn uploaded(file_name: &str) -> Self {
        Self {
            kind: NotificationKind::Uploaded,
            severity: Severity::Info,
            title: "CSV Uploaded".into(),
            description: format!("Your CSV file \"{}\" has been successfully uploaded.", file_name),
        }
    }

    pub fn no_csv_data() -> Self {
        Self {
            kind: NotificationKind::NoCsvData,
            severity: Severity::Destructive,
            title: "No CSV Data".into(),
            description: "Please upload a CSV file first.".into(),
        }
    }

    pub fn processing_complete() -> Self {
        Self {
            kind: NotificationKind::ProcessingComplete,
            severity: Severity::Info,
            title: "Processing Complete".into(),
            description: "Your CSV data has been processed successfully.".into(),
        }
    }

    pub fn error(message: &str) -> Self {
        let description = if message.is_empty() {
            "An error occurred while processing the CSV.".to_string()
        } else {
            message.to_string()
        };
        Self {
            kind: NotificationKind::Error,
            severity: Severity::Destructive,
            title: "Error".into(),
            description,
        }
    }

    pub fn download_started() -> Self {
        Self {
            kind: NotificationKind::DownloadStarted,
            severity: Severity::Info,
            title: "Download Started".into(),
            description: "Your JSON file is being downloaded.".into(),
        }
    }
}

/// 通知の出力先
///
/// セッションは `&self` で呼ぶので、状態を持つ実装は内部可変性を使う。
pub trait Notifier {
    fn notify(&self, notification: Notification);

    /// 処理中フラグの変化
    fn loading(&self, _is_loading: bool) {}

    /// 進捗（0〜100）
    fn progress(&self, _value: u8) {}
}
