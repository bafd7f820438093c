// 盤面関連のドメイン層

pub mod column;
pub mod grid;

pub use column::{compact_column, is_column_settled, ColumnKernel};
pub use grid::Grid;
