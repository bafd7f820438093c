// 圧縮設定のValue Objects

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_FAN_OUT, QUEUE_CAPACITY_PER_WORKER};

/// ワーカースレッド数を表すValue Object（1以上）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct WorkerCount(usize);

impl WorkerCount {
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(anyhow!("ワーカー数は1以上である必要があります"));
        }
        Ok(Self(count))
    }

    /// ハードウェアの並列度に合わせた既定値
    pub fn available() -> Self {
        Self(num_cpus::get().max(1))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// ハードウェアの並列度を上限とした実際のスレッド数
    pub fn on_hardware(&self) -> usize {
        self.0.min(num_cpus::get()).max(1)
    }

    /// 列数とハードウェアの並列度の両方で切り詰める
    pub fn for_columns(&self, width: usize) -> usize {
        self.on_hardware().min(width).max(1)
    }
}

impl Default for WorkerCount {
    fn default() -> Self {
        Self::available()
    }
}

impl TryFrom<usize> for WorkerCount {
    type Error = anyhow::Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WorkerCount> for usize {
    fn from(value: WorkerCount) -> Self {
        value.0
    }
}

/// 作業キューの容量
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueCapacity {
    /// 満杯なら生産者はブロックする（破棄はしない）
    Bounded(usize),
    Unbounded,
}

impl QueueCapacity {
    pub fn bounded(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(anyhow!("キュー容量は1以上である必要があります"));
        }
        Ok(Self::Bounded(capacity))
    }

    /// ワーカー数に応じた既定容量
    pub fn for_workers(workers: WorkerCount) -> Self {
        Self::Bounded(workers.get().saturating_mul(QUEUE_CAPACITY_PER_WORKER))
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bounded(0) => Err(anyhow!("キュー容量は1以上である必要があります")),
            _ => Ok(()),
        }
    }
}

impl std::str::FromStr for QueueCapacity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("unbounded") {
            return Ok(Self::Unbounded);
        }
        let n: usize = s
            .parse()
            .with_context(|| format!("キュー容量が不正です: {}", s))?;
        Self::bounded(n)
    }
}

/// multi 版で1タスクが受け持つ列数
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnsPerTask {
    /// ceil(width / MAX_FAN_OUT)。幅が小さければ1列1タスク
    Auto,
    Fixed(usize),
}

impl ColumnsPerTask {
    pub fn fixed(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(anyhow!("タスクあたりの列数は1以上である必要があります"));
        }
        Ok(Self::Fixed(n))
    }

    /// 実際の列数を決める（1..=width）
    pub fn resolve(&self, width: usize) -> usize {
        match *self {
            Self::Auto => width.div_ceil(MAX_FAN_OUT).max(1),
            Self::Fixed(n) => n.min(width).max(1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed(0) => Err(anyhow!("タスクあたりの列数は1以上である必要があります")),
            _ => Ok(()),
        }
    }
}

/// 圧縮処理の設定（ベンチマークのコンテキストとして渡す）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct CompactionConfig {
    pub workers: WorkerCount,
    pub queue_capacity: QueueCapacity,
    pub columns_per_task: ColumnsPerTask,
}

/// 設定ファイル上の表現（省略可能な項目）
#[derive(Deserialize)]
struct ConfigFile {
    workers: Option<WorkerCount>,
    queue_capacity: Option<QueueCapacity>,
    columns_per_task: Option<ColumnsPerTask>,
}

impl From<ConfigFile> for CompactionConfig {
    fn from(file: ConfigFile) -> Self {
        // キュー容量の既定値は読み込んだワーカー数から決める
        let workers = file.workers.unwrap_or_default();
        let mut config = Self::with_workers(workers);
        if let Some(capacity) = file.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(columns) = file.columns_per_task {
            config.columns_per_task = columns;
        }
        config
    }
}

impl CompactionConfig {
    /// ワーカー数を指定して作成（キュー容量も追従）
    pub fn with_workers(workers: WorkerCount) -> Self {
        Self {
            workers,
            queue_capacity: QueueCapacity::for_workers(workers),
            columns_per_task: ColumnsPerTask::Auto,
        }
    }

    pub fn queue_capacity(mut self, capacity: QueueCapacity) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn columns_per_task(mut self, columns: ColumnsPerTask) -> Self {
        self.columns_per_task = columns;
        self
    }

    pub fn validate(&self) -> Result<()> {
        // workers はValue Objectで検証済み
        self.queue_capacity.validate().context("キュー容量が不正です")?;
        self.columns_per_task
            .validate()
            .context("タスクあたりの列数が不正です")?;
        Ok(())
    }

    /// JSON文字列から読み込む（省略項目は既定値）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("設定JSONの解析に失敗しました")?;
        config.validate()?;
        Ok(config)
    }

    /// JSONファイルから読み込む
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("設定ファイルを読めません: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("設定ファイルが不正です: {}", path.display()))
    }
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self::with_workers(WorkerCount::available())
    }
}
