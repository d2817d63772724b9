//! Tistory editor session over the Chrome DevTools Protocol.
//!
//! All selectors of the platform's editor live here. The page is someone
//! else's HTML, so every step waits for its element instead of assuming it.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::target::{CloseTargetParams, TargetId};
use chromiumoxide::{Browser, Page};
use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::BrowserError;
use crate::infrastructure::PageDriver;
use crate::models::Visibility;
use crate::workflow::EditorSession;

const WRITE_LINK: &str = ".wrap_link .link_tab";
const MODE_LAYER_BUTTON: &str = "#editor-mode-layer-btn-open";
const MARKDOWN_MODE_ITEM: &str = "#editor-mode-markdown-text";
const TITLE_INPUT: &str = "#post-title-inp";
const CODEMIRROR: &str = ".CodeMirror";
const CODEMIRROR_INPUT: &str = ".CodeMirror textarea";
const PUBLISH_LAYER_BUTTON: &str = "#publish-layer-btn";
const PUBLISH_PANEL: &str = ".info_editor";
const RESERVE_BUTTON: &str = ".btn_reserve";
const CALENDAR: &str = ".tbl_calendar";
const CALENDAR_HEADING: &str = ".txt_calendar";
const CALENDAR_NEXT: &str = ".btn_next";
const HOUR_INPUT: &str = "#dateHour";
const MINUTE_INPUT: &str = "#dateMinute";
const PUBLISH_BUTTON: &str = "#publish-btn";

/// Calendar pages we are willing to flip forward.
const MAX_MONTH_STEPS: usize = 24;

/// Tistory editor session
///
/// Holds the browser, the home tab the session returns to, and the editor
/// tab while a post is being composed.
pub struct TistoryEditor {
    browser: Browser,
    home: PageDriver,
    editor: Option<PageDriver>,
    blog_base: Option<String>,
    element_wait: Duration,
    alert_wait: Duration,
    settle_delay: Duration,
}

impl TistoryEditor {
    /// `home` must be a logged-in tab showing the platform home page.
    pub fn new(browser: Browser, home: Page, config: &Config) -> Self {
        Self {
            browser,
            home: PageDriver::new(home),
            editor: None,
            blog_base: config.blog_base().map(str::to_string),
            element_wait: config.element_wait(),
            alert_wait: config.alert_wait(),
            settle_delay: config.settle_delay(),
        }
    }

    fn editor(&self) -> Result<&PageDriver> {
        self.editor.as_ref().context("editor window is not open")
    }

    async fn open_target_ids(&self) -> Result<HashSet<TargetId>> {
        Ok(self
            .browser
            .pages()
            .await?
            .iter()
            .map(|p| p.target_id().clone())
            .collect())
    }

    /// Wait for a tab that was not open before the write link was clicked.
    async fn wait_for_new_page(&self, before: &HashSet<TargetId>) -> Result<Page> {
        let started = Instant::now();
        loop {
            let pages = self.browser.pages().await?;
            if let Some(page) = pages.into_iter().find(|p| !before.contains(p.target_id())) {
                return Ok(page);
            }
            if started.elapsed() >= self.element_wait {
                return Err(BrowserError::WindowTimeout {
                    waited_ms: self.element_wait.as_millis() as u64,
                }
                .into());
            }
            sleep(Duration::from_millis(250)).await;
        }
    }

    async fn open_editor_page(&self) -> Result<Page> {
        match &self.blog_base {
            Some(base) => {
                let url = format!("{}/manage/newpost/", base);
                debug!("opening editor directly: {}", url);
                let page = self.browser.new_page("about:blank").await?;
                // Navigate from JS so a dialog raised while loading cannot block us
                let js_code = format!("location.href = {};", serde_json::to_string(&url)?);
                page.evaluate(js_code).await?;
                Ok(page)
            }
            None => {
                let before = self.open_target_ids().await?;
                self.home.wait_and_click(WRITE_LINK, self.element_wait).await?;
                self.wait_for_new_page(&before).await
            }
        }
    }

    /// Read the calendar heading, e.g. "2026년 10월".
    async fn calendar_month(&self, editor: &PageDriver) -> Result<(i32, u32)> {
        let js_code = format!(
            "(() => {{ const el = document.querySelector({}); return el ? el.textContent : ''; }})()",
            serde_json::to_string(CALENDAR_HEADING)?
        );
        let heading: String = editor.eval_as(js_code).await?;
        parse_calendar_heading(&heading)
            .with_context(|| format!("unreadable calendar heading: '{}'", heading.trim()))
    }

    async fn show_month(&self, editor: &PageDriver, year: i32, month: u32) -> Result<()> {
        let mut clicks = 0;
        loop {
            let shown = self.calendar_month(editor).await?;
            debug!("calendar shows {}-{:02}", shown.0, shown.1);
            match next_calendar_move(shown, (year, month), clicks) {
                CalendarMove::Arrived => return Ok(()),
                CalendarMove::Next => {
                    editor.wait_and_click(CALENDAR_NEXT, self.element_wait).await?;
                    clicks += 1;
                    sleep(Duration::from_millis(300)).await;
                }
                CalendarMove::Overshot => bail!(
                    "calendar shows {}-{:02}, after the target month {}-{:02}",
                    shown.0,
                    shown.1,
                    year,
                    month
                ),
                CalendarMove::TooFar => bail!(
                    "target month {}-{:02} is more than {} months ahead",
                    year,
                    month,
                    MAX_MONTH_STEPS
                ),
            }
        }
    }

    async fn click_day(&self, editor: &PageDriver, day: u32) -> Result<()> {
        let js_code = format!(
            r#"
            (() => {{
                const buttons = document.querySelectorAll({} + ' button.btn_day');
                for (const b of buttons) {{
                    if (b.textContent.trim() === {} && !b.disabled) {{
                        b.click();
                        return true;
                    }}
                }}
                return false;
            }})()
            "#,
            serde_json::to_string(CALENDAR)?,
            serde_json::to_string(&day.to_string())?
        );
        let clicked: bool = editor.eval_as(js_code).await?;
        if !clicked {
            bail!("day {} is not selectable in the calendar", day);
        }
        Ok(())
    }
}

#[async_trait]
impl EditorSession for TistoryEditor {
    async fn open_editor(&mut self) -> Result<()> {
        if self.editor.is_some() {
            warn!("이전 편집기 창이 남아 있어 먼저 닫습니다");
            self.reset().await?;
        }

        let page = self.open_editor_page().await?;
        // Track the tab before waiting on it so reset() can close a half-loaded editor
        self.editor = Some(PageDriver::new(page));
        let editor = self.editor()?;
        editor.page().bring_to_front().await?;

        // An unfinished draft triggers a "continue writing?" prompt; start fresh
        if editor.handle_dialog(false, self.alert_wait).await? {
            info!("임시저장 복원 안내를 취소했습니다");
        }

        editor.wait_for_element(MODE_LAYER_BUTTON, self.element_wait).await?;
        Ok(())
    }

    async fn switch_to_markdown(&mut self) -> Result<()> {
        let editor = self.editor()?;
        editor.wait_and_click(MODE_LAYER_BUTTON, self.element_wait).await?;
        // The mode switch asks for confirmation with a native dialog
        editor
            .wait_and_click_detached(MARKDOWN_MODE_ITEM, self.element_wait)
            .await?;
        Ok(())
    }

    async fn dismiss_alert(&mut self) -> Result<bool> {
        let editor = self.editor()?;
        editor.handle_dialog(true, self.alert_wait).await
    }

    async fn enter_title(&mut self, title: &str) -> Result<()> {
        let editor = self.editor()?;
        editor.replace_text(TITLE_INPUT, title, self.element_wait).await
    }

    async fn enter_body(&mut self, body: &str) -> Result<()> {
        let editor = self.editor()?;
        editor.wait_for_element(CODEMIRROR, self.element_wait).await?;

        let js_code = format!(
            r#"
            (() => {{
                const host = document.querySelector({});
                if (!host || !host.CodeMirror) return -1;
                host.CodeMirror.setValue({});
                return host.CodeMirror.getValue().length;
            }})()
            "#,
            serde_json::to_string(CODEMIRROR)?,
            serde_json::to_string(body)?
        );
        let written: i64 = editor.eval_as(js_code).await?;

        if written < 0 {
            debug!("CodeMirror API not exposed, typing into the editor instead");
            let input = editor
                .wait_for_element(CODEMIRROR_INPUT, self.element_wait)
                .await?;
            input.focus().await?;
            input.type_str(body).await?;
        } else if written == 0 && !body.is_empty() {
            bail!("markdown editor stayed empty after writing the body");
        }
        Ok(())
    }

    async fn open_publish_panel(&mut self) -> Result<()> {
        let editor = self.editor()?;
        editor
            .wait_and_click(PUBLISH_LAYER_BUTTON, self.element_wait)
            .await?;
        editor.wait_for_element(PUBLISH_PANEL, self.element_wait).await?;
        Ok(())
    }

    async fn set_visibility(&mut self, visibility: Visibility) -> Result<()> {
        let editor = self.editor()?;
        let selector = format!("#{}", visibility.radio_id());
        // The radio input is visually hidden behind its label
        editor
            .wait_and_click_detached(&selector, self.element_wait)
            .await?;
        sleep(Duration::from_millis(300)).await;

        let js_code = format!(
            "(() => {{ const el = document.querySelector({}); return !!(el && el.checked); }})()",
            serde_json::to_string(&selector)?
        );
        let checked: bool = editor.eval_as(js_code).await?;
        if !checked {
            bail!("visibility radio {} did not get selected", selector);
        }
        Ok(())
    }

    async fn set_schedule(&mut self, at: NaiveDateTime) -> Result<()> {
        let editor = self.editor()?;

        editor.wait_and_click(RESERVE_BUTTON, self.element_wait).await?;
        editor.wait_for_element(CALENDAR, self.element_wait).await?;

        self.show_month(editor, at.year(), at.month()).await?;
        self.click_day(editor, at.day()).await?;

        editor
            .replace_text(HOUR_INPUT, &at.hour().to_string(), self.element_wait)
            .await?;
        editor
            .replace_text(MINUTE_INPUT, &at.minute().to_string(), self.element_wait)
            .await?;

        info!("📅 예약 시간 설정: {}", at.format("%Y-%m-%d %H:%M"));
        Ok(())
    }

    async fn confirm(&mut self) -> Result<()> {
        let editor = self.editor()?;
        editor.wait_and_click(PUBLISH_BUTTON, self.element_wait).await?;
        sleep(self.settle_delay).await;
        // The editor leaves the page once the post is accepted
        editor
            .wait_for_absence(PUBLISH_BUTTON, self.element_wait)
            .await
            .context("publish was not acknowledged")?;
        Ok(())
    }

    async fn reset(&mut self) -> Result<()> {
        if let Some(editor) = self.editor.take() {
            let target_id = editor.page().target_id().clone();
            // closeTarget skips beforeunload prompts of a half-written post
            if let Err(e) = self.browser.execute(CloseTargetParams::new(target_id)).await {
                warn!("편집기 창 닫기 실패: {}", e);
            }
        }
        self.home.page().bring_to_front().await?;
        sleep(self.settle_delay).await;
        Ok(())
    }
}

/// What to do with the reservation calendar next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMove {
    Arrived,
    Next,
    /// The calendar already shows a later month
    Overshot,
    /// `MAX_MONTH_STEPS` clicks were not enough
    TooFar,
}

/// Decide the next calendar action from the month shown, the target month
/// and the number of "next" clicks made so far.
pub fn next_calendar_move(shown: (i32, u32), target: (i32, u32), clicks: usize) -> CalendarMove {
    if shown == target {
        CalendarMove::Arrived
    } else if shown > target {
        CalendarMove::Overshot
    } else if clicks >= MAX_MONTH_STEPS {
        CalendarMove::TooFar
    } else {
        CalendarMove::Next
    }
}

/// Parse a calendar heading such as "2026년 10월" or "2026.10".
pub fn parse_calendar_heading(heading: &str) -> Option<(i32, u32)> {
    let re = Regex::new(r"(\d{4})\D+(\d{1,2})").ok()?;
    let caps = re.captures(heading)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}
