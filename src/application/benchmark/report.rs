// ベンチマーク結果の定義

use std::time::Duration;

use serde::Serialize;

use crate::domain::compaction::{Algorithm, CompactionError};

/// 1アルゴリズム分の実行結果
#[derive(Clone, Debug, Serialize)]
pub struct AlgorithmRun {
    pub algorithm: Algorithm,
    /// 平坦化された結果（列優先）。失敗時はエラー
    pub outcome: Result<Vec<i32>, CompactionError>,
    pub elapsed: Duration,
}

impl AlgorithmRun {
    pub fn output(&self) -> Option<&[i32]> {
        self.outcome.as_deref().ok()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 2アルゴリズム間の一致判定
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PairEquivalence {
    pub first: Algorithm,
    pub second: Algorithm,
    pub equal: bool,
}

/// 1回のベンチマークの集計
#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkReport {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// 実行順に並ぶ
    pub runs: Vec<AlgorithmRun>,
    /// 全ての非順序ペア（実行順）
    pub equivalences: Vec<PairEquivalence>,
}

impl BenchmarkReport {
    /// 全アルゴリズムが成功し、全ペアが一致したか
    pub fn all_equal(&self) -> bool {
        self.runs.iter().all(AlgorithmRun::is_ok) && self.equivalences.iter().all(|p| p.equal)
    }

    /// 失敗したアルゴリズムとその理由
    pub fn failures(&self) -> Vec<(Algorithm, &CompactionError)> {
        self.runs
            .iter()
            .filter_map(|run| run.outcome.as_ref().err().map(|e| (run.algorithm, e)))
            .collect()
    }

    pub fn run(&self, algorithm: Algorithm) -> Option<&AlgorithmRun> {
        self.runs.iter().find(|run| run.algorithm == algorithm)
    }

    /// 2アルゴリズムの一致判定（順不同）
    pub fn equal(&self, a: Algorithm, b: Algorithm) -> Option<bool> {
        self.equivalences
            .iter()
            .find(|p| (p.first == a && p.second == b) || (p.first == b && p.second == a))
            .map(|p| p.equal)
    }
}
