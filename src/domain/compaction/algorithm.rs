// アルゴリズム識別子

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// 落下処理の4つの実装
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// 単一スレッド版（正解の基準）
    Sequential,
    /// 列（または列の塊）ごとに並列タスクを投入
    Multi,
    /// 共有カウンタから列を取り合う固定ワーカー
    Active,
    /// キュー経由で列を配る固定ワーカー
    Queue,
}

impl Algorithm {
    /// 既定の実行順
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Sequential,
        Algorithm::Multi,
        Algorithm::Active,
        Algorithm::Queue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Sequential => "sequential",
            Algorithm::Multi => "multi",
            Algorithm::Active => "active",
            Algorithm::Queue => "queue",
        }
    }

    /// カンマ区切りのリストを解析
    pub fn parse_list(s: &str) -> Result<Vec<Algorithm>> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Algorithm::from_str)
            .collect()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("未知のアルゴリズム: {} (sequential, multi, active, queue)", s))
    }
}
