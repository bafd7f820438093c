// 並列実行管理（失敗の集約と panic の変換）

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::domain::compaction::CompactionError;
use crate::vlog;

/// ワーカー群の失敗を集約する
///
/// 最初に記録された失敗だけを保持し、中断フラグを立てる。
/// 以降の失敗は破棄されるが、ワーカー自体は最後まで join される。
pub struct FailureCollector {
    abort_flag: AtomicBool,
    first: Mutex<Option<CompactionError>>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self {
            abort_flag: AtomicBool::new(false),
            first: Mutex::new(None),
        }
    }

    /// 失敗を記録（2件目以降は破棄）
    pub fn record(&self, error: CompactionError) {
        let mut first = self.first.lock().unwrap_or_else(|e| e.into_inner());
        if first.is_none() {
            vlog!("最初の失敗を記録: {}", error);
            *first = Some(error);
        } else {
            vlog!("後続の失敗を破棄: {}", error);
        }
        self.abort_flag.store(true, Ordering::Release);
    }

    /// 中断されたかチェック（ワーカーが協調的に参照する）
    pub fn is_aborted(&self) -> bool {
        self.abort_flag.load(Ordering::Acquire)
    }

    /// 集約結果を取り出す
    pub fn into_result(self) -> Result<(), CompactionError> {
        match self.first.into_inner().unwrap_or_else(|e| e.into_inner()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for FailureCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// ワーカー本体を実行し、panic を WorkerFailure に変換する
pub fn run_worker<F>(worker: &str, body: F) -> Result<(), CompactionError>
where
    F: FnOnce() -> Result<(), CompactionError>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => Err(CompactionError::worker(worker, panic_message(payload.as_ref()))),
    }
}

/// panic ペイロードから文字列を取り出す
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
