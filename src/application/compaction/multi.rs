// 列並列版: 列の塊ごとにタスクを投入する

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::domain::compaction::{
    Algorithm, ColumnsPerTask, CompactionConfig, CompactionError, Compactor,
};
use crate::domain::grid::{compact_column, ColumnKernel, Grid};
use crate::infrastructure::executor::{run_worker, FailureCollector};
use crate::vlog;

/// 列（または連続する列の塊）ごとに独立タスクを投入する
///
/// 各タスクは `par_chunks_mut` で静的に割り当てた互いに素な領域だけを書き換える。
/// 全タスクの完了を待ってから、最初に観測した失敗を返す。
pub struct MultiCompactor {
    pool: rayon::ThreadPool,
    columns_per_task: ColumnsPerTask,
    kernel: ColumnKernel,
}

impl MultiCompactor {
    pub fn new(config: &CompactionConfig) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.on_hardware())
            .thread_name(|i| format!("dropsim-multi-{}", i))
            .build()
            .context("multi 用スレッドプールを作成できません")?;
        Ok(Self {
            pool,
            columns_per_task: config.columns_per_task,
            kernel: compact_column,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_kernel(mut self, kernel: ColumnKernel) -> Self {
        self.kernel = kernel;
        self
    }
}

impl Compactor for MultiCompactor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Multi
    }

    fn compact(&self, mut grid: Grid) -> Result<Grid, CompactionError> {
        let height = grid.height();
        // resolve は width 以下に丸めるので塊の大きさはセル数を超えない
        let columns_per_task = self.columns_per_task.resolve(grid.width());
        let kernel = self.kernel;
        let failures = FailureCollector::new();

        vlog!(
            "width={} height={} columns_per_task={}",
            grid.width(),
            height,
            columns_per_task
        );

        self.pool.install(|| {
            grid.cells_mut()
                .par_chunks_mut(columns_per_task * height)
                .enumerate()
                .for_each(|(task, cells)| {
                    if failures.is_aborted() {
                        return;
                    }
                    let first_column = task * columns_per_task;
                    let result = run_worker(&format!("multi-{}", task), || {
                        for column in cells.chunks_exact_mut(height) {
                            kernel(column);
                        }
                        Ok(())
                    });
                    if let Err(e) = result {
                        vlog!("列 {} 以降のタスクが失敗: {}", first_column, e);
                        failures.record(e);
                    }
                });
        });

        failures.into_result()?;
        Ok(grid)
    }
}
