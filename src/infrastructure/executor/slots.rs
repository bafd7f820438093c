// 列の書き込み先を払い出す表

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::compaction::CompactionError;
use crate::domain::grid::Grid;

/// 盤面の各列を「一度だけ」払い出す表
///
/// 列はそれぞれ互いに素なスライスなので、払い出した後はロック無しで書き込める。
/// 同じ列を二度要求した場合はエラーになり、二重処理を防ぐ。
pub struct ColumnSlots<'a> {
    slots: Vec<Mutex<Option<&'a mut [i32]>>>,
    claimed: AtomicUsize,
}

impl<'a> ColumnSlots<'a> {
    pub fn new(grid: &'a mut Grid) -> Self {
        let slots = grid.columns_mut().map(|col| Mutex::new(Some(col))).collect();
        Self {
            slots,
            claimed: AtomicUsize::new(0),
        }
    }

    /// 列数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 列 `column` の書き込み先を取得
    pub fn claim(&self, column: usize) -> Result<&'a mut [i32], CompactionError> {
        let slot = self
            .slots
            .get(column)
            .ok_or_else(|| CompactionError::column_out_of_range(column, self.slots.len()))?;
        let taken = slot.lock().unwrap_or_else(|e| e.into_inner()).take();
        match taken {
            Some(cells) => {
                self.claimed.fetch_add(1, Ordering::Relaxed);
                Ok(cells)
            }
            None => Err(CompactionError::worker(
                "dispatch",
                format!("列 {} が二重に払い出されました", column),
            )),
        }
    }

    /// まだ払い出されていない列数
    pub fn unclaimed(&self) -> usize {
        self.slots.len() - self.claimed.load(Ordering::Relaxed)
    }
}
