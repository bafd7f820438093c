// 圧縮処理のエラー定義

use serde::Serialize;
use thiserror::Error;

/// 圧縮処理で発生するエラー
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum CompactionError {
    /// 平坦化された入力長が width * height と一致しない
    #[error("invalid dimensions: expected {expected} cells, got {actual}")]
    InvalidDimensions { expected: usize, actual: usize },

    /// 幅・高さが正でない、または書き込み先インデックスが範囲外
    #[error("index out of range: {what} = {value} (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        value: i64,
        limit: i64,
    },

    /// 並行ワーカーの失敗（panic含む）。最初に観測したもののみ保持
    #[error("worker {worker} failed: {message}")]
    WorkerFailure { worker: String, message: String },
}

impl CompactionError {
    /// 非正の寸法エラー
    pub fn non_positive(what: &'static str, value: i64) -> Self {
        Self::IndexOutOfRange {
            what,
            value,
            limit: 1,
        }
    }

    /// 列インデックスの範囲外エラー
    pub fn column_out_of_range(column: usize, width: usize) -> Self {
        Self::IndexOutOfRange {
            what: "column",
            value: column as i64,
            limit: width as i64,
        }
    }

    pub fn worker(worker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkerFailure {
            worker: worker.into(),
            message: message.into(),
        }
    }
}
