// Grid型 - 任意サイズの盤面（列優先、row 0 が最下段）

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::constants::{EMPTY, MAX_TILE_ID};
use crate::domain::compaction::CompactionError;
use crate::domain::grid::column::is_column_settled;

/// width × height の盤面
///
/// セルは列優先で格納する: `index = col * height + row`。
/// 1列が連続領域になるため、列ごとの並列分割がそのままスライス分割になる。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

/// 寸法の検証（非正なら IndexOutOfRange）
fn checked_dims(width: i64, height: i64) -> Result<(usize, usize), CompactionError> {
    if width <= 0 {
        return Err(CompactionError::non_positive("width", width));
    }
    if height <= 0 {
        return Err(CompactionError::non_positive("height", height));
    }
    Ok((width as usize, height as usize))
}

impl Grid {
    /// 平坦な列優先データから構築
    pub fn from_flat(cells: Vec<i32>, width: i64, height: i64) -> Result<Self, CompactionError> {
        let (width, height) = checked_dims(width, height)?;
        let expected = width.saturating_mul(height);
        if cells.len() != expected {
            return Err(CompactionError::InvalidDimensions {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// 列のリストから構築（各列は下から上の順）
    pub fn from_columns(columns: &[Vec<i32>]) -> Result<Self, CompactionError> {
        let height = columns.first().map_or(0, Vec::len);
        let cells: Vec<i32> = columns.iter().flatten().copied().collect();
        Self::from_flat(cells, columns.len() as i64, height as i64)
    }

    /// 空の盤面を作成
    pub fn empty(width: i64, height: i64) -> Result<Self, CompactionError> {
        let (w, h) = checked_dims(width, height)?;
        Self::from_flat(vec![EMPTY; w.saturating_mul(h)], width, height)
    }

    /// 同じ寸法の空盤面（出力バッファ用）
    pub fn empty_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![EMPTY; self.cells.len()],
        }
    }

    /// 再現可能なランダム盤面（density は 0.0~1.0 に丸める）
    pub fn random(width: i64, height: i64, density: f64, seed: u64) -> Result<Self, CompactionError> {
        let mut grid = Self::empty(width, height)?;
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        let mut rng = StdRng::seed_from_u64(seed);
        for cell in grid.cells.iter_mut() {
            if rng.gen_bool(density) {
                *cell = rng.gen_range(1..=MAX_TILE_ID);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 平坦データへの読み取り専用アクセス
    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [i32] {
        &mut self.cells
    }

    /// 所有権ごと平坦データを取り出す
    pub fn into_cells(self) -> Vec<i32> {
        self.cells
    }

    /// セルを取得（範囲外はNone）
    pub fn get(&self, col: usize, row: usize) -> Option<i32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[col * self.height + row])
    }

    /// セルを設定
    pub fn set(&mut self, col: usize, row: usize, value: i32) -> Result<(), CompactionError> {
        if col >= self.width {
            return Err(CompactionError::column_out_of_range(col, self.width));
        }
        if row >= self.height {
            return Err(CompactionError::IndexOutOfRange {
                what: "row",
                value: row as i64,
                limit: self.height as i64,
            });
        }
        self.cells[col * self.height + row] = value;
        Ok(())
    }

    /// 列スライス（下から上）
    pub fn column(&self, col: usize) -> Option<&[i32]> {
        if col >= self.width {
            return None;
        }
        let start = col * self.height;
        Some(&self.cells[start..start + self.height])
    }

    /// 全列を左から順に走査
    pub fn columns(&self) -> std::slice::ChunksExact<'_, i32> {
        self.cells.chunks_exact(self.height)
    }

    /// 全列を可変で走査（各列は互いに素な領域）
    pub(crate) fn columns_mut(&mut self) -> std::slice::ChunksExactMut<'_, i32> {
        self.cells.chunks_exact_mut(self.height)
    }

    /// 行優先（row 0 = 最下段が先頭）で出力。外部の描画処理向け
    pub fn row_major_bottom_up(&self) -> Vec<i32> {
        let mut out = Vec::with_capacity(self.cells.len());
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(self.cells[col * self.height + row]);
            }
        }
        out
    }

    /// すべての列が落下済みか
    pub fn is_compacted(&self) -> bool {
        self.columns().all(is_column_settled)
    }

    /// 非空セル数
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }
}
