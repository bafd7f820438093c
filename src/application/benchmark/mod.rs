// ベンチマーク（計時と相互検証）

pub mod harness;
pub mod report;

pub use harness::{BenchmarkHarness, TestCase};
pub use report::{AlgorithmRun, BenchmarkReport, PairEquivalence};

use anyhow::Result;

use crate::domain::compaction::{Algorithm, CompactionConfig};

/// 既定設定でテストケースを1つ実行する
pub fn run_test_case(
    name: &str,
    initial_data: &[i32],
    width: i64,
    height: i64,
    algorithms: Option<&[Algorithm]>,
) -> Result<BenchmarkReport> {
    let harness = BenchmarkHarness::new(&CompactionConfig::default())?;
    let mut case = TestCase::new(name, initial_data.to_vec(), width, height);
    if let Some(algorithms) = algorithms {
        case = case.algorithms(algorithms.to_vec());
    }
    harness.run_test_case(&case)
}
