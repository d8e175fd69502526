//! 端末への通知出力
//!
//! 通知は stdout / stderr、進捗は indicatif のプログレスバーで表示する。

use crate::session::{Notification, Notifier, Severity};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

#[derive(Default)]
pub struct ConsoleNotifier {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn new_bar() -> ProgressBar {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("  {bar:40.cyan/blue} {pos:>3}% {msg}") {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.set_message("処理中...");
        bar
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = format!("{}: {}", notification.title, notification.description);
        let guard = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        let print = |line: &str| match notification.severity {
            Severity::Info => println!("✔ {}", line),
            Severity::Destructive => eprintln!("✖ {}", line),
        };
        match &*guard {
            Some(bar) => bar.suspend(|| print(&line)),
            None => print(&line),
        }
    }

    fn loading(&self, is_loading: bool) {
        let mut guard = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if is_loading {
            *guard = Some(Self::new_bar());
        } else if let Some(bar) = guard.take() {
            bar.finish_and_clear();
        }
    }

    fn progress(&self, value: u8) {
        let guard = self.bar.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = &*guard {
            bar.set_position(u64::from(value));
        }
    }
}
