// 列単位の重力処理（安定分割）

use crate::constants::EMPTY;

/// 列単位の処理関数（通常は compact_column）
pub type ColumnKernel = fn(&mut [i32]) -> usize;

/// 1列分をその場で落下させる: 非空セルを下（row 0）から詰め、残りを空にする
///
/// 読み出し位置は常に書き込み位置以上なので、非空セル同士の相対順序は保たれる。
/// 戻り値は非空セル数。
#[inline]
pub fn compact_column(column: &mut [i32]) -> usize {
    let mut filled = 0usize;
    for read in 0..column.len() {
        let cell = column[read];
        if cell != EMPTY {
            column[filled] = cell;
            filled += 1;
        }
    }
    column[filled..].fill(EMPTY);
    filled
}

/// 列がすでに落下済みか（空セルの上に非空セルが無いか）
#[inline]
pub fn is_column_settled(column: &[i32]) -> bool {
    match column.iter().position(|&c| c == EMPTY) {
        Some(first_empty) => column[first_empty..].iter().all(|&c| c == EMPTY),
        None => true,
    }
}
