// 計測モジュール

use std::time::{Duration, Instant};

/// 処理を実行し、結果と経過時間（単調時計）を返す
#[inline]
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let t0 = Instant::now();
    let r = f();
    (r, t0.elapsed())
}

/// Duration をミリ秒文字列に整形
pub fn fmt_dur_ms(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        format!("{:.3} ms", ms)
    } else {
        format!("{:.1} ms", ms)
    }
}
