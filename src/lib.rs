// 重力落下シミュレーション - ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod profiling;
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::benchmark::{run_test_case, BenchmarkHarness, BenchmarkReport, TestCase};
pub use application::compaction::{
    build_compactor, ActiveCompactor, MultiCompactor, QueueCompactor, SequentialCompactor,
};
pub use domain::compaction::{outputs_equal, Algorithm, CompactionConfig, CompactionError, Compactor};
pub use domain::grid::Grid;
