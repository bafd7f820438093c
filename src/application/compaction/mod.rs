// 落下処理の4実装

pub mod active;
pub mod multi;
pub mod queue;
pub mod sequential;

pub use active::ActiveCompactor;
pub use multi::MultiCompactor;
pub use queue::QueueCompactor;
pub use sequential::SequentialCompactor;

use anyhow::Result;

use crate::domain::compaction::{Algorithm, CompactionConfig, Compactor};

/// 設定から指定アルゴリズムの実装を作る
pub fn build_compactor(algorithm: Algorithm, config: &CompactionConfig) -> Result<Box<dyn Compactor>> {
    let compactor: Box<dyn Compactor> = match algorithm {
        Algorithm::Sequential => Box::new(SequentialCompactor::new()),
        Algorithm::Multi => Box::new(MultiCompactor::new(config)?),
        Algorithm::Active => Box::new(ActiveCompactor::new(config)),
        Algorithm::Queue => Box::new(QueueCompactor::new(config)),
    };
    Ok(compactor)
}
