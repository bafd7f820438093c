// 統合テスト

use dropsim::application::benchmark::{run_test_case, BenchmarkHarness, TestCase};
use dropsim::application::compaction::build_compactor;
use dropsim::domain::compaction::{
    outputs_equal, Algorithm, ColumnsPerTask, CompactionConfig, CompactionError, Compactor,
    QueueCapacity, WorkerCount,
};
use dropsim::domain::grid::Grid;

fn config(workers: usize) -> CompactionConfig {
    CompactionConfig::with_workers(WorkerCount::new(workers).unwrap())
}

fn all_compactors(config: &CompactionConfig) -> Vec<Box<dyn Compactor>> {
    Algorithm::ALL
        .into_iter()
        .map(|a| build_compactor(a, config).unwrap())
        .collect()
}

/// 列ごとの非空セル列（下から上）
fn tiles_by_column(grid: &Grid) -> Vec<Vec<i32>> {
    grid.columns()
        .map(|col| col.iter().copied().filter(|&c| c != 0).collect())
        .collect()
}

/// ドメイン層の統合テスト
mod domain_integration {
    use super::*;

    #[test]
    fn grid_construction_validates_dimensions() {
        assert!(Grid::from_flat(vec![0; 12], 3, 4).is_ok());
        assert_eq!(
            Grid::from_flat(vec![0; 13], 3, 4),
            Err(CompactionError::InvalidDimensions {
                expected: 12,
                actual: 13
            })
        );
        assert!(matches!(
            Grid::from_flat(vec![], -2, 4),
            Err(CompactionError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn equivalence_checker_is_strict() {
        assert!(outputs_equal(&[1, 2, 0], &[1, 2, 0]));
        assert!(!outputs_equal(&[1, 2, 0], &[1, 2]));
        assert!(!outputs_equal(&[1, 2, 0], &[2, 1, 0]));
    }

    #[test]
    fn config_file_drives_compactors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "workers": 2, "queue_capacity": { "bounded": 1 }, "columns_per_task": { "fixed": 3 } }"#,
        )
        .unwrap();

        let config = CompactionConfig::from_json_file(&path).unwrap();
        assert_eq!(config.queue_capacity, QueueCapacity::Bounded(1));
        assert_eq!(config.columns_per_task, ColumnsPerTask::Fixed(3));

        let grid = Grid::random(10, 10, 0.5, 5).unwrap();
        let expected = build_compactor(Algorithm::Sequential, &config)
            .unwrap()
            .compact(grid.clone())
            .unwrap();
        for compactor in all_compactors(&config) {
            assert_eq!(compactor.compact(grid.clone()).unwrap(), expected);
        }
    }
}

/// 落下処理の性質テスト（全アルゴリズム共通）
mod compaction_properties {
    use super::*;

    #[test]
    fn reference_example_for_every_algorithm() {
        let grid = Grid::from_flat(vec![0, 2, 0, 0, 3, 0, 0, 0, 0, 0, 0, 5], 3, 4).unwrap();
        for compactor in all_compactors(&config(4)) {
            let out = compactor.compact(grid.clone()).unwrap();
            assert_eq!(
                out.cells(),
                &[2, 0, 0, 0, 3, 0, 0, 0, 5, 0, 0, 0],
                "{}",
                compactor.algorithm()
            );
        }
    }

    #[test]
    fn all_empty_grid_is_unchanged() {
        for (w, h) in [(1, 1), (5, 3), (70, 2)] {
            let grid = Grid::empty(w, h).unwrap();
            for compactor in all_compactors(&config(3)) {
                assert_eq!(compactor.compact(grid.clone()).unwrap(), grid);
            }
        }
    }

    #[test]
    fn idempotent_stable_and_conserving() {
        let grid = Grid::random(23, 17, 0.5, 0xC3).unwrap();
        for compactor in all_compactors(&config(4)) {
            let once = compactor.compact(grid.clone()).unwrap();
            let twice = compactor.compact(once.clone()).unwrap();
            assert_eq!(once, twice, "{} not idempotent", compactor.algorithm());
            assert!(once.is_compacted());
            // 列ごとの非空セル列（順序込み）が保存される = 安定性 + 保存則
            assert_eq!(tiles_by_column(&grid), tiles_by_column(&once));
        }
    }

    #[test]
    fn single_dense_column_with_empty_neighbours() {
        let mut columns = vec![vec![0; 128]; 9];
        columns[4] = (1..=128).collect();
        columns[4][0] = 0;
        let grid = Grid::from_columns(&columns).unwrap();
        for workers in [1, 2, 9, 32] {
            for compactor in all_compactors(&config(workers)) {
                let out = compactor.compact(grid.clone()).unwrap();
                let mut expected: Vec<i32> = (2..=128).collect();
                expected.push(0);
                assert_eq!(out.column(4).unwrap(), &expected[..], "{}", compactor.algorithm());
                assert_eq!(out.occupied(), 127);
            }
        }
    }
}

/// 乱数盤面での相互一致（疎・中・密）
mod parity {
    use super::*;

    fn run_parity_case(width: i64, height: i64, density: f64, seed: u64, workers: usize) {
        let grid = Grid::random(width, height, density, seed).unwrap();
        let compactors = all_compactors(&config(workers));
        let outputs: Vec<Grid> = compactors
            .iter()
            .map(|c| c.compact(grid.clone()).unwrap())
            .collect();
        for (c, out) in compactors.iter().zip(&outputs).skip(1) {
            assert!(
                outputs_equal(outputs[0].cells(), out.cells()),
                "{} mismatch for density {density} seed {seed}",
                c.algorithm()
            );
        }
    }

    #[test]
    fn parity_sparse_mid_dense() {
        run_parity_case(96, 96, 0.10, 0xA1, 4);
        run_parity_case(96, 96, 0.42, 0xB2, 4);
        run_parity_case(96, 96, 0.83, 0xC3, 4);
    }

    #[test]
    fn parity_odd_shapes() {
        run_parity_case(1, 300, 0.5, 11, 3);
        run_parity_case(300, 1, 0.5, 22, 3);
        run_parity_case(129, 7, 0.35, 33, 16);
    }

    #[test]
    fn parity_multiple_seeds() {
        for seed in [11u64, 22, 33, 44] {
            run_parity_case(72, 40, 0.35, seed, 2);
        }
    }
}

/// ベンチマークの統合テスト
mod benchmark_integration {
    use super::*;

    #[test]
    fn free_function_reports_all_pairs() {
        let grid = Grid::random(40, 30, 0.4, 9).unwrap();
        let report = run_test_case("random", grid.cells(), 40, 30, None).unwrap();
        assert_eq!(report.runs.len(), 4);
        assert_eq!(report.equivalences.len(), 6);
        assert!(report.all_equal());
        assert!(report.failures().is_empty());
    }

    #[test]
    fn subset_and_invalid_input() {
        let report = run_test_case(
            "subset",
            &[0, 1, 1, 0],
            2,
            2,
            Some(&[Algorithm::Active, Algorithm::Multi]),
        )
        .unwrap();
        let order: Vec<Algorithm> = report.runs.iter().map(|r| r.algorithm).collect();
        assert_eq!(order, vec![Algorithm::Multi, Algorithm::Active]);
        assert_eq!(report.run(Algorithm::Active).unwrap().output(), Some(&[1, 0, 1, 0][..]));

        assert!(run_test_case("bad", &[0, 1, 1], 2, 2, None).is_err());
    }

    #[test]
    fn report_serializes_for_external_reporters() {
        let harness = BenchmarkHarness::new(&config(2)).unwrap();
        let case = TestCase::new("json", vec![0, 7, 0, 0], 2, 2);
        let report = harness.run_test_case(&case).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["name"], "json");
        assert_eq!(json["runs"][0]["algorithm"], "sequential");
        assert_eq!(json["equivalences"].as_array().unwrap().len(), 6);
    }
}
