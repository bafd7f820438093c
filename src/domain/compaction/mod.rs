// 圧縮（重力落下）のドメインモデル

pub mod algorithm;
pub mod config;
pub mod equivalence;
pub mod error;

pub use algorithm::Algorithm;
pub use config::{ColumnsPerTask, CompactionConfig, QueueCapacity, WorkerCount};
pub use equivalence::outputs_equal;
pub use error::CompactionError;

use crate::domain::grid::Grid;

/// 落下処理の共通インターフェース
///
/// `compact` は呼び出し側から受け取った盤面を所有し、自由に書き換えてよい。
/// 戻り値の各列は、入力列の非空セルを同じ相対順序で row 0 から詰めたものになる。
pub trait Compactor: Send + Sync {
    /// このインスタンスの実装種別
    fn algorithm(&self) -> Algorithm;

    /// 重力を適用した盤面を返す
    fn compact(&self, grid: Grid) -> Result<Grid, CompactionError>;
}
