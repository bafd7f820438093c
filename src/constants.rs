// 盤面定数と既定値

/// 空セルを表す値
pub const EMPTY: i32 = 0;

/// multi 版で同時に投入するタスク数の上限（スレッド生成コストの抑制）
pub const MAX_FAN_OUT: usize = 64;

/// 有界キューの既定容量（ワーカー数に対する倍率）
pub const QUEUE_CAPACITY_PER_WORKER: usize = 2;

/// ランダム盤面で使うタイルIDの最大値（1..=MAX_TILE_ID）
pub const MAX_TILE_ID: i32 = 4;
