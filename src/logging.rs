// 詳細ログ出力（モジュール名と経過時間付き）

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

/// グローバルな詳細ログフラグ
pub static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// ログファイルのグローバルハンドル（未設定なら標準エラー出力へ）
static LOG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// ログファイルを初期化する
pub fn init_log_file(path: impl AsRef<Path>) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    *log_file = Some(file);
    Ok(())
}

/// 最初のログ出力時刻（各行の経過時間の基準）
static STARTED: OnceLock<Instant> = OnceLock::new();

/// `dropsim::application::compaction::queue` -> `compaction::queue`
fn short_target(target: &str) -> &str {
    let target = target.strip_prefix("dropsim::").unwrap_or(target);
    target
        .strip_prefix("application::")
        .or_else(|| target.strip_prefix("infrastructure::"))
        .or_else(|| target.strip_prefix("domain::"))
        .unwrap_or(target)
}

/// 1行分の書式: `[   12.345ms compaction::queue] message`
fn format_line(target: &str, elapsed_ms: f64, message: &str) -> String {
    format!("[{:>10.3}ms {}] {}", elapsed_ms, short_target(target), message)
}

/// ログを書き込む（target は呼び出し元のモジュールパス）
pub fn write_log(target: &str, message: String) {
    let started = STARTED.get_or_init(Instant::now);
    let line = format_line(target, started.elapsed().as_secs_f64() * 1000.0, &message);
    let mut log_file = LOG_FILE.lock().unwrap_or_else(|e| e.into_inner());
    match log_file.as_mut() {
        Some(file) => {
            let _ = writeln!(file, "{}", line);
            let _ = file.flush();
        }
        None => eprintln!("{}", line),
    }
}

/// 詳細ログを有効にする
pub fn enable_verbose_logging() {
    VERBOSE_LOGGING.store(true, Ordering::Relaxed);
}

/// 詳細ログを無効にする
pub fn disable_verbose_logging() {
    VERBOSE_LOGGING.store(false, Ordering::Relaxed);
}

/// 詳細ログが有効かチェック
pub fn is_verbose() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

/// 詳細ログ出力マクロ（呼び出し元のモジュール名を付けて出力）
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            $crate::logging::write_log(module_path!(), format!($($arg)*));
        }
    };
}
