// アプリケーション層 - 落下処理の実装とベンチマーク

pub mod benchmark;
pub mod compaction;
