//! Page driver - infrastructure layer
//!
//! Owns one browser page and exposes the primitives the editor automation is
//! built from: JS evaluation, bounded waits for elements, clicks, typing and
//! native dialog handling. Knows nothing about posts or schedules.

use crate::error::BrowserError;
use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::page::HandleJavaScriptDialogParams;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Pause between two polls of a bounded wait.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Page driver
///
/// Every lookup goes through a bounded wait: elements on the editor are
/// rendered asynchronously and are never assumed to exist yet.
#[derive(Clone)]
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Evaluate JS and return the JSON result.
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// Evaluate JS and deserialize the result.
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// Wait until `selector` matches an element, at most `timeout`.
    pub async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<Element> {
        let started = Instant::now();
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                debug!("element ready: {} ({} ms)", selector, started.elapsed().as_millis());
                return Ok(element);
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::ElementTimeout {
                    selector: selector.to_string(),
                    waited_ms: timeout.as_millis() as u64,
                }
                .into());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until nothing matches `selector` any more, at most `timeout`.
    pub async fn wait_for_absence(&self, selector: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_err() {
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(BrowserError::ScriptFailed {
                    message: format!(
                        "{} still present after {} ms",
                        selector,
                        timeout.as_millis()
                    ),
                }
                .into());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait for `selector` and click it.
    pub async fn wait_and_click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_for_element(selector, timeout).await?;
        element.scroll_into_view().await?;
        element.click().await?;
        Ok(())
    }

    /// Wait for `selector`, then click it from a detached JS task.
    ///
    /// Use this for controls whose handler opens a native `alert`/`confirm`:
    /// a CDP mouse click does not return while the dialog is open.
    pub async fn wait_and_click_detached(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.wait_for_element(selector, timeout).await?;
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                setTimeout(() => el.click(), 0);
                return true;
            }})()
            "#,
            serde_json::to_string(selector)?
        );
        let clicked: bool = self.eval_as(js_code).await?;
        if !clicked {
            return Err(BrowserError::ScriptFailed {
                message: format!("element {} vanished before click", selector),
            }
            .into());
        }
        Ok(())
    }

    /// Wait for an input, clear it and type `text` into it.
    pub async fn replace_text(&self, selector: &str, text: &str, timeout: Duration) -> Result<()> {
        let element = self.wait_for_element(selector, timeout).await?;
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.value = '';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            serde_json::to_string(selector)?
        );
        self.eval(js_code).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// Accept (or dismiss) a native JS dialog if one shows up within `timeout`.
    ///
    /// Returns `true` when a dialog was handled. No dialog is not an error.
    pub async fn handle_dialog(&self, accept: bool, timeout: Duration) -> Result<bool> {
        let started = Instant::now();
        loop {
            // CDP rejects the command when no dialog is showing
            if self
                .page
                .execute(HandleJavaScriptDialogParams::new(accept))
                .await
                .is_ok()
            {
                debug!("native dialog handled (accept: {})", accept);
                return Ok(true);
            }
            if started.elapsed() >= timeout {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }
}
