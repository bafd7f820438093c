// 列タスクの作業キュー

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use crate::domain::compaction::QueueCapacity;

/// キューで受け渡す1列分の仕事（書き込み先ごと手渡す）
pub struct ColumnTask<'a> {
    pub index: usize,
    pub cells: &'a mut [i32],
}

/// 設定に応じたチャネルを作る
///
/// 有界なら満杯時に `send` がブロックする（破棄はしない）。
/// 全 Sender を drop するとワーカー側の `recv` が Err を返し、終了の合図になる。
pub fn work_queue<T>(capacity: QueueCapacity) -> (Sender<T>, Receiver<T>) {
    match capacity {
        QueueCapacity::Bounded(n) => bounded(n.max(1)),
        QueueCapacity::Unbounded => unbounded(),
    }
}
