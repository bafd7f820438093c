// キュー版: 生産者が列を積み、固定ワーカーが取り出す

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::Receiver;

use crate::domain::compaction::{
    Algorithm, CompactionConfig, CompactionError, Compactor, QueueCapacity, WorkerCount,
};
use crate::domain::grid::{compact_column, ColumnKernel, Grid};
use crate::infrastructure::executor::{run_worker, work_queue, ColumnTask, FailureCollector};
use crate::vlog;

/// 生産者／消費者で列を配る
///
/// 生産者（呼び出しスレッド）が各列の書き込み先スライスを1度ずつキューへ積み、
/// ワーカーが取り出して処理する。スライスの所有権ごと手渡すので書き込みは互いに素。
/// 有界キューが満杯なら生産者はブロックする。全列を積み終えたら送信側を閉じ、
/// ワーカーはキューが空になった時点で終了する。
pub struct QueueCompactor {
    workers: WorkerCount,
    capacity: QueueCapacity,
    kernel: ColumnKernel,
}

impl QueueCompactor {
    pub fn new(config: &CompactionConfig) -> Self {
        Self {
            workers: config.workers,
            capacity: config.queue_capacity,
            kernel: compact_column,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_kernel(mut self, kernel: ColumnKernel) -> Self {
        self.kernel = kernel;
        self
    }
}

/// 1ワーカー分の消費ループ。キューが閉じるか中断されるまで回る
fn consume(
    rx: Receiver<ColumnTask<'_>>,
    failures: &FailureCollector,
    processed: &AtomicUsize,
    kernel: ColumnKernel,
) -> Result<(), CompactionError> {
    while let Ok(task) = rx.recv() {
        if failures.is_aborted() {
            break;
        }
        let filled = kernel(task.cells);
        vlog!("列 {}: {} セル", task.index, filled);
        processed.fetch_add(1, Ordering::Relaxed);
    }
    Ok(())
}

impl Compactor for QueueCompactor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Queue
    }

    fn compact(&self, mut grid: Grid) -> Result<Grid, CompactionError> {
        let width = grid.width();
        let workers = self.workers.for_columns(width);
        let kernel = self.kernel;
        let failures = FailureCollector::new();
        let processed = AtomicUsize::new(0);

        vlog!(
            "width={} workers={} capacity={:?}",
            width,
            workers,
            self.capacity
        );

        thread::scope(|s| {
            let (tx, rx) = work_queue(self.capacity);
            for id in 0..workers {
                let rx = rx.clone();
                let (failures, processed) = (&failures, &processed);
                s.spawn(move || {
                    let name = format!("queue-{}", id);
                    if let Err(e) = run_worker(&name, || consume(rx, failures, processed, kernel)) {
                        failures.record(e);
                    }
                });
            }
            // 生産者側は受信側を持たない（全ワーカー終了で send が失敗する）
            drop(rx);

            for (index, cells) in grid.columns_mut().enumerate() {
                if failures.is_aborted() {
                    break;
                }
                if tx.send(ColumnTask { index, cells }).is_err() {
                    vlog!("受信側が全て終了したため列 {} 以降を積めません", index);
                    break;
                }
            }
            // 送信側を閉じてワーカーに終了を伝える
            drop(tx);
        });

        let done = processed.load(Ordering::Relaxed);
        if !failures.is_aborted() && done != width {
            failures.record(CompactionError::worker(
                "queue",
                format!("{} / {} 列しか処理されませんでした", done, width),
            ));
        }

        failures.into_result()?;
        Ok(grid)
    }
}
