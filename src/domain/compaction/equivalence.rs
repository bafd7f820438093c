// 結果の同一性判定

/// 2つの結果が要素ごとに完全一致するか（長さが違えば即false）
pub fn outputs_equal(a: &[i32], b: &[i32]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).all(|(x, y)| x == y)
}
