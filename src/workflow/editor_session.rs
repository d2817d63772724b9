//! The browser surface the publish flow drives.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::Visibility;

/// One editor session on the blogging platform.
///
/// Each method is one step of publishing a post and must only return once
/// the UI element the step depends on was available (bounded wait) and the
/// action was performed. The publish flow guarantees the call order.
#[async_trait]
pub trait EditorSession: Send {
    /// Open a fresh editor window and make it the active one.
    async fn open_editor(&mut self) -> Result<()>;

    /// Switch the editor to markdown mode.
    async fn switch_to_markdown(&mut self) -> Result<()>;

    /// Accept a modal alert if one appears; `Ok(false)` when there was none.
    async fn dismiss_alert(&mut self) -> Result<bool>;

    async fn enter_title(&mut self, title: &str) -> Result<()>;

    async fn enter_body(&mut self, body: &str) -> Result<()>;

    /// Open the visibility / schedule panel.
    async fn open_publish_panel(&mut self) -> Result<()>;

    async fn set_visibility(&mut self, visibility: Visibility) -> Result<()>;

    /// Set the reservation date, hour and minute.
    async fn set_schedule(&mut self, at: NaiveDateTime) -> Result<()>;

    /// Click the final publish control.
    async fn confirm(&mut self) -> Result<()>;

    /// Close the editor window and return to the home tab.
    async fn reset(&mut self) -> Result<()>;
}
