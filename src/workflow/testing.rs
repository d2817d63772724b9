//! Scripted editor session for tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{PublishStep, Visibility};
use crate::workflow::EditorSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Step(PublishStep),
    Reset,
}

/// Records every call and fails or hangs where it is told to.
#[derive(Default)]
pub struct ScriptedSession {
    pub calls: Vec<Call>,
    pub titles: Vec<String>,
    pub bodies: Vec<String>,
    pub visibilities: Vec<Visibility>,
    pub schedules: Vec<NaiveDateTime>,
    /// `(item, step)`: fail `step` while editing the n-th opened editor (1-based)
    pub failures: Vec<(usize, PublishStep)>,
    /// Never return from this step
    pub hang_at: Option<PublishStep>,
    pub alert_present: bool,
    pub reset_fails: bool,
    pub opened: usize,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            alert_present: true,
            ..Self::default()
        }
    }

    pub fn failing_at(item: usize, step: PublishStep) -> Self {
        Self {
            failures: vec![(item, step)],
            ..Self::new()
        }
    }

    pub fn steps(&self) -> Vec<PublishStep> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Step(step) => Some(*step),
                Call::Reset => None,
            })
            .collect()
    }

    pub fn reset_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Reset).count()
    }

    async fn record(&mut self, step: PublishStep) -> Result<()> {
        if step == PublishStep::OpenEditor {
            self.opened += 1;
        }
        self.calls.push(Call::Step(step));
        if self.hang_at == Some(step) {
            std::future::pending::<()>().await;
        }
        if self.failures.contains(&(self.opened, step)) {
            bail!("scripted failure");
        }
        Ok(())
    }
}

#[async_trait]
impl EditorSession for ScriptedSession {
    async fn open_editor(&mut self) -> Result<()> {
        self.record(PublishStep::OpenEditor).await
    }

    async fn switch_to_markdown(&mut self) -> Result<()> {
        self.record(PublishStep::SwitchToMarkdown).await
    }

    async fn dismiss_alert(&mut self) -> Result<bool> {
        self.record(PublishStep::DismissAlert).await?;
        Ok(self.alert_present)
    }

    async fn enter_title(&mut self, title: &str) -> Result<()> {
        self.record(PublishStep::EnterTitle).await?;
        self.titles.push(title.to_string());
        Ok(())
    }

    async fn enter_body(&mut self, body: &str) -> Result<()> {
        self.record(PublishStep::EnterBody).await?;
        self.bodies.push(body.to_string());
        Ok(())
    }

    async fn open_publish_panel(&mut self) -> Result<()> {
        self.record(PublishStep::OpenPublishPanel).await
    }

    async fn set_visibility(&mut self, visibility: Visibility) -> Result<()> {
        self.record(PublishStep::SetVisibility).await?;
        self.visibilities.push(visibility);
        Ok(())
    }

    async fn set_schedule(&mut self, at: NaiveDateTime) -> Result<()> {
        self.record(PublishStep::SetSchedule).await?;
        self.schedules.push(at);
        Ok(())
    }

    async fn confirm(&mut self) -> Result<()> {
        self.record(PublishStep::Confirm).await
    }

    async fn reset(&mut self) -> Result<()> {
        self.calls.push(Call::Reset);
        if self.reset_fails {
            bail!("scripted reset failure");
        }
        Ok(())
    }
}
