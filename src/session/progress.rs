//! 見かけ上の進捗
//!
//! 受信チャンク数に応じて一定量ずつ進めるだけで、実際の転送率ではない。

/// 1チャンクあたりの増分
pub const PROGRESS_STEP: u8 = 10;
/// 完了前の上限
pub const PROGRESS_CAP: u8 = 90;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressEstimate {
    value: u8,
}

impl ProgressEstimate {
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    /// チャンク受信ごとに進める（上限90、単調増加）
    pub fn advance(&mut self) -> u8 {
        self.value = self.value.saturating_add(PROGRESS_STEP).min(PROGRESS_CAP).max(self.value);
        self.value
    }

    pub fn complete(&mut self) -> u8 {
        self.value = PROGRESS_DONE;
        self.value
    }
}
