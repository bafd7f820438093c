// インフラ層 - 並行実行の技術的実装

pub mod executor;

pub use executor::{ColumnSlots, FailureCollector};
