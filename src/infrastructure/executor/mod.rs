// 並行実行の基盤

pub mod parallel;
pub mod queue;
pub mod slots;

pub use parallel::{run_worker, FailureCollector};
pub use queue::{work_queue, ColumnTask};
pub use slots::ColumnSlots;
