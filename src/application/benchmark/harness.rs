// ベンチマークハーネス

use anyhow::{anyhow, Context, Result};

use crate::application::benchmark::report::{AlgorithmRun, BenchmarkReport, PairEquivalence};
use crate::application::compaction::build_compactor;
use crate::domain::compaction::{outputs_equal, Algorithm, CompactionConfig, Compactor};
use crate::domain::grid::Grid;
use crate::profiling::{fmt_dur_ms, measure};
use crate::vlog;

/// 名前付きのテストケース
#[derive(Clone, Debug)]
pub struct TestCase {
    pub name: String,
    /// 列優先の平坦データ
    pub initial: Vec<i32>,
    pub width: i64,
    pub height: i64,
    /// None なら全アルゴリズム
    pub algorithms: Option<Vec<Algorithm>>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, initial: Vec<i32>, width: i64, height: i64) -> Self {
        Self {
            name: name.into(),
            initial,
            width,
            height,
            algorithms: None,
        }
    }

    /// 既存の盤面から作成
    pub fn from_grid(name: impl Into<String>, grid: &Grid) -> Self {
        Self::new(
            name,
            grid.cells().to_vec(),
            grid.width() as i64,
            grid.height() as i64,
        )
    }

    pub fn algorithms(mut self, algorithms: Vec<Algorithm>) -> Self {
        self.algorithms = Some(algorithms);
        self
    }
}

/// 全アルゴリズムを同じ入力で実行し、計時と相互一致を集計する
///
/// エンジンはプロセス全体の状態ではなく、このコンテキストが保持する。
pub struct BenchmarkHarness {
    compactors: Vec<Box<dyn Compactor>>,
}

impl BenchmarkHarness {
    /// 設定から4実装すべてを用意
    pub fn new(config: &CompactionConfig) -> Result<Self> {
        config.validate().context("圧縮設定が不正です")?;
        let compactors = Algorithm::ALL
            .into_iter()
            .map(|algorithm| build_compactor(algorithm, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { compactors })
    }

    /// 任意の実装群から作成（実行順は Algorithm の既定順）
    pub fn from_compactors(mut compactors: Vec<Box<dyn Compactor>>) -> Self {
        compactors.sort_by_key(|c| c.algorithm());
        compactors.dedup_by_key(|c| c.algorithm());
        Self { compactors }
    }

    /// 登録済みのアルゴリズム（実行順）
    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.compactors.iter().map(|c| c.algorithm()).collect()
    }

    /// テストケースを実行
    ///
    /// 入力盤面の構築に失敗した場合はエラー。個々のアルゴリズムの失敗は
    /// レポートに記録し、残りのアルゴリズムの計測は続ける。
    pub fn run_test_case(&self, case: &TestCase) -> Result<BenchmarkReport> {
        let canonical = Grid::from_flat(case.initial.clone(), case.width, case.height)
            .with_context(|| format!("テストケース {} の盤面が不正です", case.name))?;

        let selected = self.select(case.algorithms.as_deref())?;
        vlog!(
            "{}: {}x{} / {:?}",
            case.name,
            canonical.width(),
            canonical.height(),
            selected.iter().map(|c| c.algorithm()).collect::<Vec<_>>()
        );

        let mut runs = Vec::with_capacity(selected.len());
        for compactor in selected {
            // 実装ごとに独立した複製を渡す
            let copy = canonical.clone();
            let (outcome, elapsed) = measure(|| compactor.compact(copy));
            let outcome = outcome.map(Grid::into_cells);
            match &outcome {
                Ok(_) => vlog!("{} {}", compactor.algorithm(), fmt_dur_ms(elapsed)),
                Err(e) => vlog!("{} 失敗: {}", compactor.algorithm(), e),
            }
            runs.push(AlgorithmRun {
                algorithm: compactor.algorithm(),
                outcome,
                elapsed,
            });
        }

        let equivalences = pairwise_equivalence(&runs);
        Ok(BenchmarkReport {
            name: case.name.clone(),
            width: canonical.width(),
            height: canonical.height(),
            runs,
            equivalences,
        })
    }

    /// 要求されたアルゴリズムを既定順で選ぶ（重複は除く）
    fn select(&self, requested: Option<&[Algorithm]>) -> Result<Vec<&dyn Compactor>> {
        let Some(requested) = requested else {
            return Ok(self.compactors.iter().map(|c| c.as_ref()).collect());
        };
        if let Some(missing) = requested
            .iter()
            .find(|a| !self.compactors.iter().any(|c| c.algorithm() == **a))
        {
            return Err(anyhow!("アルゴリズム {} は登録されていません", missing));
        }
        Ok(self
            .compactors
            .iter()
            .filter(|c| requested.contains(&c.algorithm()))
            .map(|c| c.as_ref())
            .collect())
    }
}

/// 全ての非順序ペアの一致判定（失敗を含むペアは不一致）
fn pairwise_equivalence(runs: &[AlgorithmRun]) -> Vec<PairEquivalence> {
    let mut pairs = Vec::new();
    for (i, a) in runs.iter().enumerate() {
        for b in &runs[i + 1..] {
            let equal = match (a.output(), b.output()) {
                (Some(x), Some(y)) => outputs_equal(x, y),
                _ => false,
            };
            pairs.push(PairEquivalence {
                first: a.algorithm,
                second: b.algorithm,
                equal,
            });
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compaction::{CompactionError, WorkerCount};

    /// 常に失敗する実装
    struct Broken(Algorithm);

    impl Compactor for Broken {
        fn algorithm(&self) -> Algorithm {
            self.0
        }

        fn compact(&self, _grid: Grid) -> Result<Grid, CompactionError> {
            Err(CompactionError::worker("broken-0", "always fails"))
        }
    }

    /// 何もしない（誤った）実装
    struct Identity(Algorithm);

    impl Compactor for Identity {
        fn algorithm(&self) -> Algorithm {
            self.0
        }

        fn compact(&self, grid: Grid) -> Result<Grid, CompactionError> {
            Ok(grid)
        }
    }

    fn harness() -> BenchmarkHarness {
        BenchmarkHarness::new(&CompactionConfig::with_workers(WorkerCount::new(3).unwrap()))
            .unwrap()
    }

    fn example_case() -> TestCase {
        TestCase::new(
            "example",
            vec![0, 2, 0, 0, 3, 0, 0, 0, 0, 0, 0, 5],
            3,
            4,
        )
    }

    #[test]
    fn runs_all_four_in_fixed_order() {
        let report = harness().run_test_case(&example_case()).unwrap();
        let order: Vec<Algorithm> = report.runs.iter().map(|r| r.algorithm).collect();
        assert_eq!(order, Algorithm::ALL.to_vec());
        assert_eq!(report.equivalences.len(), 6);
        assert!(report.all_equal());
        for run in &report.runs {
            assert_eq!(run.output().unwrap(), &[2, 0, 0, 0, 3, 0, 0, 0, 5, 0, 0, 0]);
        }
    }

    #[test]
    fn requested_subset_keeps_fixed_order() {
        let case = example_case().algorithms(vec![
            Algorithm::Queue,
            Algorithm::Sequential,
            Algorithm::Queue,
        ]);
        let report = harness().run_test_case(&case).unwrap();
        let order: Vec<Algorithm> = report.runs.iter().map(|r| r.algorithm).collect();
        assert_eq!(order, vec![Algorithm::Sequential, Algorithm::Queue]);
        assert_eq!(report.equivalences.len(), 1);
        assert_eq!(report.equal(Algorithm::Queue, Algorithm::Sequential), Some(true));
    }

    #[test]
    fn canonical_input_is_not_mutated() {
        let case = example_case();
        let before = case.initial.clone();
        harness().run_test_case(&case).unwrap();
        assert_eq!(case.initial, before);
    }

    #[test]
    fn invalid_case_is_rejected() {
        let case = TestCase::new("bad", vec![0; 5], 3, 4);
        assert!(harness().run_test_case(&case).is_err());
        let case = TestCase::new("bad", vec![], 0, 4);
        assert!(harness().run_test_case(&case).is_err());
    }

    #[test]
    fn failure_does_not_stop_other_algorithms() {
        let harness = BenchmarkHarness::from_compactors(vec![
            build_compactor(Algorithm::Queue, &CompactionConfig::default()).unwrap(),
            Box::new(Broken(Algorithm::Active)) as Box<dyn Compactor>,
            build_compactor(Algorithm::Sequential, &CompactionConfig::default()).unwrap(),
        ]);
        assert_eq!(
            harness.algorithms(),
            vec![Algorithm::Sequential, Algorithm::Active, Algorithm::Queue]
        );

        let report = harness.run_test_case(&example_case()).unwrap();
        assert_eq!(report.runs.len(), 3);
        assert!(!report.all_equal());

        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, Algorithm::Active);

        assert_eq!(report.equal(Algorithm::Sequential, Algorithm::Queue), Some(true));
        assert_eq!(report.equal(Algorithm::Sequential, Algorithm::Active), Some(false));
    }

    #[test]
    fn mismatch_is_reported() {
        let harness = BenchmarkHarness::from_compactors(vec![
            build_compactor(Algorithm::Sequential, &CompactionConfig::default()).unwrap(),
            Box::new(Identity(Algorithm::Multi)) as Box<dyn Compactor>,
        ]);
        let report = harness.run_test_case(&example_case()).unwrap();
        assert!(report.failures().is_empty());
        assert_eq!(report.equal(Algorithm::Sequential, Algorithm::Multi), Some(false));
        assert!(!report.all_equal());
    }

    #[test]
    fn unregistered_algorithm_is_an_error() {
        let harness = BenchmarkHarness::from_compactors(vec![Box::new(Identity(Algorithm::Multi)) as Box<dyn Compactor>]);
        let case = example_case().algorithms(vec![Algorithm::Queue]);
        assert!(harness.run_test_case(&case).is_err());
    }
}
