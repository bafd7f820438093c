// アクティブスケジューリング版: 共有カウンタから列を取り合う

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crate::domain::compaction::{
    Algorithm, CompactionConfig, CompactionError, Compactor, WorkerCount,
};
use crate::domain::grid::{compact_column, ColumnKernel, Grid};
use crate::infrastructure::executor::{run_worker, ColumnSlots, FailureCollector};
use crate::vlog;

/// 固定数のワーカーが、処理を終えるたびに次の列を取りに行く
///
/// 列の割り当ては `fetch_add` による動的な払い出しなので、空の列と密な列が
/// 混在していても手の空いたワーカーから順に仕事を拾う。
/// カウンタが width を超えたワーカーは終了し、全員の終了を待って返る。
pub struct ActiveCompactor {
    workers: WorkerCount,
    kernel: ColumnKernel,
}

impl ActiveCompactor {
    pub fn new(config: &CompactionConfig) -> Self {
        Self {
            workers: config.workers,
            kernel: compact_column,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_kernel(mut self, kernel: ColumnKernel) -> Self {
        self.kernel = kernel;
        self
    }
}

/// 1ワーカー分のループ。処理した列数を返す
fn worker_loop(
    slots: &ColumnSlots<'_>,
    next: &AtomicUsize,
    failures: &FailureCollector,
    kernel: ColumnKernel,
) -> Result<usize, CompactionError> {
    let mut processed = 0usize;
    loop {
        if failures.is_aborted() {
            break;
        }
        let column = next.fetch_add(1, Ordering::Relaxed);
        if column >= slots.len() {
            break;
        }
        let cells = slots.claim(column)?;
        kernel(cells);
        processed += 1;
    }
    Ok(processed)
}

impl Compactor for ActiveCompactor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Active
    }

    fn compact(&self, mut grid: Grid) -> Result<Grid, CompactionError> {
        let workers = self.workers.for_columns(grid.width());
        let kernel = self.kernel;
        let failures = FailureCollector::new();
        let next = AtomicUsize::new(0);

        {
            let slots = ColumnSlots::new(&mut grid);
            thread::scope(|s| {
                for id in 0..workers {
                    let (slots, next, failures) = (&slots, &next, &failures);
                    s.spawn(move || {
                        let name = format!("active-{}", id);
                        let mut processed = 0usize;
                        let result = run_worker(&name, || {
                            processed = worker_loop(slots, next, failures, kernel)?;
                            Ok(())
                        });
                        match result {
                            Ok(()) => vlog!("{} が {} 列を処理して終了", name, processed),
                            Err(e) => failures.record(e),
                        }
                    });
                }
            });

            if !failures.is_aborted() && slots.unclaimed() != 0 {
                failures.record(CompactionError::worker(
                    "active",
                    format!("{} 列が未処理のまま終了しました", slots.unclaimed()),
                ));
            }
        }

        failures.into_result()?;
        Ok(grid)
    }
}
