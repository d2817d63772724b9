/// Logging setup and banner helpers
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` for this crate when `verbose`
/// is on, `info` everywhere else. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "info,blog_autopublish=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Initialize the run log file
///
/// # Parameters
/// - `log_file_path`: log file path
pub fn init_log_file(log_file_path: &str, title: &str) -> Result<()> {
    let log_header = format!(
        "{}\n{} - {}\n{}\n\n",
        "=".repeat(60),
        title,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

pub fn log_startup(mode: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 blog_autopublish v{} - {}", env!("CARGO_PKG_VERSION"), mode);
    info!("{}", "=".repeat(60));
}

/// Print the final statistics of a batch
///
/// # Parameters
/// - `success`: succeeded items
/// - `failed`: failed items
/// - `total`: total items
pub fn print_final_stats(success: usize, failed: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 작업 완료");
    info!(
        "완료 시각: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 성공: {}/{}", success, total);
    info!("❌ 실패: {}", failed);
    info!("{}", "=".repeat(60));
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("블로그 자동화", 3), "블로그...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn log_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.txt");
        init_log_file(path.to_str().unwrap(), "Publish log").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&"=".repeat(60)));
        assert!(content.contains("Publish log - "));
    }
}
