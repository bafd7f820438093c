// 単一スレッド版（正解の基準）

use crate::domain::compaction::{Algorithm, CompactionError, Compactor};
use crate::domain::grid::{compact_column, Grid};

/// 列 0..width を順番に処理する
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialCompactor;

impl SequentialCompactor {
    pub fn new() -> Self {
        Self
    }
}

impl Compactor for SequentialCompactor {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Sequential
    }

    fn compact(&self, mut grid: Grid) -> Result<Grid, CompactionError> {
        for column in grid.columns_mut() {
            compact_column(column);
        }
        Ok(grid)
    }
}
