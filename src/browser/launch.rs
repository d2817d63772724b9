use std::path::Path;

use crate::error::BrowserError;
use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Launch a browser with a persistent profile and open `url`.
///
/// The profile keeps the platform login between runs. `headless` is only
/// useful once the profile already holds a session.
pub async fn launch_browser(profile_dir: &Path, url: &str, headless: bool) -> Result<(Browser, Page)> {
    info!("🚀 브라우저 실행 중 (프로필: {})", profile_dir.display());
    debug!("target URL: {}", url);

    let mut builder = BrowserConfig::builder()
        .user_data_dir(profile_dir)
        .viewport(None)
        .args(vec![
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
            "--disable-extensions",
            "--disable-background-timer-throttling",
            "--disable-backgrounding-occluded-windows",
            "--disable-renderer-backgrounding",
            "--disable-features=TranslateUI",
        ]);
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    let config = builder.build().map_err(|e| {
        error!("브라우저 설정 오류: {}", e);
        BrowserError::LaunchFailed { message: e }
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("브라우저 실행 실패: {}", e);
        BrowserError::LaunchFailed {
            message: e.to_string(),
        }
    })?;
    debug!("browser launched");

    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page(url).await.map_err(|e| {
        error!("새 탭 생성 실패: {}", e);
        e
    })?;

    info!("✅ 브라우저 열림: {}", url);
    Ok((browser, page))
}
