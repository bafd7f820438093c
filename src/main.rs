// 重力落下ベンチマーク - コマンドライン

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use dropsim::application::benchmark::{BenchmarkHarness, TestCase};
use dropsim::domain::compaction::{
    Algorithm, ColumnsPerTask, CompactionConfig, QueueCapacity, WorkerCount,
};
use dropsim::domain::grid::Grid;
use dropsim::logging;
use dropsim::profiling::fmt_dur_ms;

const USAGE: &str = "usage: dropsim [--width N] [--height N] [--density F] [--seed N] \
[--workers N] [--queue-capacity N|unbounded] [--columns-per-task N] [--config FILE] \
[--algorithms a,b,...] [--verbose] [--log FILE]";

/// コマンドライン引数
struct MainArgs {
    width: i64,
    height: i64,
    density: f64,
    seed: u64,
    config_path: Option<PathBuf>,
    workers: Option<usize>,
    queue_capacity: Option<QueueCapacity>,
    columns_per_task: Option<usize>,
    algorithms: Option<Vec<Algorithm>>,
    verbose: bool,
    log_path: Option<PathBuf>,
}

impl Default for MainArgs {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            density: 0.42,
            seed: 0x5EED_1234,
            config_path: None,
            workers: None,
            queue_capacity: None,
            columns_per_task: None,
            algorithms: None,
            verbose: false,
            log_path: None,
        }
    }
}

fn parse_args() -> Result<MainArgs> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut out = MainArgs::default();
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .map(String::as_str)
                .ok_or_else(|| anyhow!("{} には値が必要です\n{}", flag, USAGE))
        };
        match flag.as_str() {
            "--width" => out.width = value()?.parse().context("--width は整数")?,
            "--height" => out.height = value()?.parse().context("--height は整数")?,
            "--density" => out.density = value()?.parse().context("--density は 0.0~1.0")?,
            "--seed" => out.seed = value()?.parse().context("--seed は整数")?,
            "--workers" => out.workers = Some(value()?.parse().context("--workers は正の整数")?),
            "--queue-capacity" => out.queue_capacity = Some(value()?.parse()?),
            "--columns-per-task" => {
                out.columns_per_task = Some(value()?.parse().context("--columns-per-task は正の整数")?)
            }
            "--config" => out.config_path = Some(PathBuf::from(value()?)),
            "--algorithms" => out.algorithms = Some(Algorithm::parse_list(value()?)?),
            "--log" => out.log_path = Some(PathBuf::from(value()?)),
            "--verbose" => out.verbose = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("未知の引数: {}\n{}", other, USAGE),
        }
    }
    Ok(out)
}

/// 設定ファイルとコマンドライン指定を合成（コマンドラインが優先）
fn build_config(args: &MainArgs) -> Result<CompactionConfig> {
    let mut config = match &args.config_path {
        Some(path) => CompactionConfig::from_json_file(path)?,
        None => CompactionConfig::default(),
    };
    if let Some(n) = args.workers {
        config.workers = WorkerCount::new(n)?;
        if args.config_path.is_none() {
            config.queue_capacity = QueueCapacity::for_workers(config.workers);
        }
    }
    if let Some(capacity) = args.queue_capacity {
        config.queue_capacity = capacity;
    }
    if let Some(n) = args.columns_per_task {
        config.columns_per_task = ColumnsPerTask::fixed(n)?;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    if let Some(path) = &args.log_path {
        logging::init_log_file(path)
            .with_context(|| format!("ログファイルを作成できません: {}", path.display()))?;
    }
    if args.verbose {
        logging::enable_verbose_logging();
    }

    let config = build_config(&args)?;
    let harness = BenchmarkHarness::new(&config)?;

    let grid = Grid::random(args.width, args.height, args.density, args.seed)
        .context("初期盤面を作成できません")?;
    let mut case = TestCase::from_grid(
        format!("random-{}x{}-d{}-s{}", args.width, args.height, args.density, args.seed),
        &grid,
    );
    if let Some(algorithms) = &args.algorithms {
        case = case.algorithms(algorithms.clone());
    }

    println!(
        "{}: workers={} queue={:?} columns_per_task={:?} tiles={}",
        case.name,
        config.workers.get(),
        config.queue_capacity,
        config.columns_per_task,
        grid.occupied()
    );

    let report = harness.run_test_case(&case)?;
    for run in &report.runs {
        match &run.outcome {
            Ok(_) => println!("  {:<10} {}", run.algorithm, fmt_dur_ms(run.elapsed)),
            Err(e) => println!("  {:<10} FAILED ({})", run.algorithm, e),
        }
    }
    for pair in &report.equivalences {
        let status = if pair.equal { "MATCH" } else { "MISMATCH" };
        println!("  {} vs {}: {}", pair.first, pair.second, status);
    }

    if !report.all_equal() {
        bail!("結果が一致しないアルゴリズムがあります");
    }
    Ok(())
}
