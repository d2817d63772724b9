use crate::error::BrowserError;
use anyhow::Result;
use chromiumoxide::Page;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::info;

/// Open the login page and wait until the user has signed in by hand.
///
/// Login is detected by the page leaving the login path; once seen, the
/// page is sent to `home_url`, where the write link lives.
pub async fn wait_for_login(
    page: &Page,
    login_url: &str,
    home_url: &str,
    timeout: Duration,
) -> Result<()> {
    page.goto(login_url).await?;
    info!("🔐 열린 브라우저 창에서 로그인해 주세요 (최대 {}초 대기)", timeout.as_secs());

    let login_path = login_path(login_url);
    let started = Instant::now();
    loop {
        let url = page.url().await?.unwrap_or_default();
        if !url.is_empty() && !url.contains(&login_path) {
            info!("✓ 로그인 확인");
            break;
        }
        if started.elapsed() >= timeout {
            return Err(BrowserError::LoginTimeout {
                waited_secs: timeout.as_secs(),
            }
            .into());
        }
        sleep(Duration::from_secs(1)).await;
    }

    page.goto(home_url).await?;
    Ok(())
}

/// Path part of the login URL, used to recognise the login page.
fn login_path(login_url: &str) -> String {
    login_url
        .split("://")
        .nth(1)
        .and_then(|rest| rest.find('/').map(|i| rest[i..].to_string()))
        .unwrap_or_else(|| login_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_path_drops_scheme_and_host() {
        assert_eq!(login_path("https://www.tistory.com/auth/login"), "/auth/login");
        assert_eq!(login_path("/auth/login"), "/auth/login");
    }
}
