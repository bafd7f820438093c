// ドメイン層 - 盤面と落下処理の契約

pub mod compaction;
pub mod grid;
