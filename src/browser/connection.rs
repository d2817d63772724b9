use crate::error::AppError;
use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Connect to a running browser and pick the working page.
///
/// The browser must have been started with `--remote-debugging-port`. A tab
/// whose URL or title contains `target_match` is reused; otherwise a new tab
/// is opened on `target_url` (or `about:blank`).
///
/// # Parameters
/// - `port`: DevTools port
/// - `target_url`: page to open when no tab matches
/// - `target_match`: substring looked up in tab URLs and titles
///
/// # Returns
/// The connected browser and the working page
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_match: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("브라우저 연결 중: {}", browser_url);
    debug!("target URL: {:?}, target match: {:?}", target_url, target_match);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("브라우저 연결 실패: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("browser connected");

    // Drive CDP events in the background
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // Give the browser a moment to report its targets
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("{} page(s) open", pages.len());

    if let Some(needle) = target_match {
        for p in pages.iter() {
            let url = p.url().await.ok().flatten().unwrap_or_default();
            let title = p.get_title().await.ok().flatten().unwrap_or_default();
            debug!("checking page: {} | {}", title, url);
            if url.contains(needle) || title.contains(needle) {
                info!("✓ 기존 탭 사용: {}", url);
                return Ok((browser, p.clone()));
            }
        }
        debug!("no page matches '{}', opening a new one", needle);
    }

    let new_page = match target_url {
        Some(url) => {
            let page = browser.new_page("about:blank").await.map_err(|e| {
                error!("새 탭 생성 실패: {}", e);
                e
            })?;
            page.goto(url).await.map_err(|e| {
                error!("{} 이동 실패: {}", url, e);
                e
            })?;
            info!("이동 완료: {}", url);
            page
        }
        None => browser.new_page("about:blank").await?,
    };

    Ok((browser, new_page))
}
