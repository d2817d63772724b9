//! Publish flow - workflow layer
//!
//! Defines the full life of one scheduled post in the editor:
//!
//! 1. open editor → markdown mode → accept the mode alert
//! 2. title → body
//! 3. publish panel → visibility → reservation time → confirm
//! 4. always return the session to its home state
//!
//! A failing step stops the item; the remaining steps are not attempted.

use anyhow::Result;
use chrono::NaiveDateTime;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::PublishError;
use crate::models::{Article, PublishStatus, PublishStep, Visibility};
use crate::workflow::{EditorSession, PublishCtx};

/// Publish flow
///
/// - runs the fixed step sequence against an [`EditorSession`]
/// - bounds every step with a timeout
/// - does not own the session; the orchestrator does
pub struct PublishFlow {
    visibility: Visibility,
    step_timeout: Duration,
}

impl PublishFlow {
    pub fn new(config: &Config, visibility: Visibility) -> Self {
        Self::with_step_timeout(visibility, config.step_timeout())
    }

    pub fn with_step_timeout(visibility: Visibility, step_timeout: Duration) -> Self {
        Self {
            visibility,
            step_timeout,
        }
    }

    /// Publish `article` for `scheduled_at` and report the outcome.
    ///
    /// The session is reset afterwards whatever happened; a failed reset is
    /// logged and does not change the item's status.
    ///
    /// # Returns
    /// `Published`, or `Failed` naming the first step that failed or timed out
    pub async fn run<S>(
        &self,
        session: &mut S,
        ctx: &PublishCtx,
        article: &Article,
        scheduled_at: NaiveDateTime,
    ) -> PublishStatus
    where
        S: EditorSession + ?Sized,
    {
        info!(
            "{} 📝 '{}' → {}",
            ctx,
            article.title,
            scheduled_at.format("%Y-%m-%d %H:%M")
        );

        let status = match self.run_steps(session, ctx, article, scheduled_at).await {
            Ok(()) => {
                info!("{} ✅ 예약 완료", ctx);
                PublishStatus::Published
            }
            Err(PublishError::StepFailed { step, reason }) => {
                warn!("{} ❌ 실패 단계 [{}]: {}", ctx, step, reason);
                PublishStatus::Failed {
                    step: Some(step),
                    reason,
                }
            }
            Err(other) => PublishStatus::Failed {
                step: None,
                reason: other.to_string(),
            },
        };

        if let Err(e) = session.reset().await {
            warn!("{} ⚠️ 편집기 정리 실패: {:#}", ctx, e);
        }

        status
    }

    async fn run_steps<S>(
        &self,
        session: &mut S,
        ctx: &PublishCtx,
        article: &Article,
        scheduled_at: NaiveDateTime,
    ) -> Result<(), PublishError>
    where
        S: EditorSession + ?Sized,
    {
        for step in PublishStep::SEQUENCE {
            debug!("{} step: {}", ctx, step);
            let outcome = timeout(
                self.step_timeout,
                self.perform(session, ctx, step, article, scheduled_at),
            )
            .await;

            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    return Err(PublishError::StepFailed {
                        step,
                        reason: format!("{:#}", e),
                    })
                }
                Err(_) => {
                    return Err(PublishError::StepFailed {
                        step,
                        reason: format!("timed out after {} ms", self.step_timeout.as_millis()),
                    })
                }
            }
        }
        Ok(())
    }

    async fn perform<S>(
        &self,
        session: &mut S,
        ctx: &PublishCtx,
        step: PublishStep,
        article: &Article,
        scheduled_at: NaiveDateTime,
    ) -> Result<()>
    where
        S: EditorSession + ?Sized,
    {
        match step {
            PublishStep::OpenEditor => session.open_editor().await,
            PublishStep::SwitchToMarkdown => session.switch_to_markdown().await,
            PublishStep::DismissAlert => {
                if session.dismiss_alert().await? {
                    debug!("{} alert accepted", ctx);
                } else {
                    debug!("{} no alert shown", ctx);
                }
                Ok(())
            }
            PublishStep::EnterTitle => session.enter_title(&article.title).await,
            PublishStep::EnterBody => session.enter_body(&article.body).await,
            PublishStep::OpenPublishPanel => session.open_publish_panel().await,
            PublishStep::SetVisibility => session.set_visibility(self.visibility).await,
            PublishStep::SetSchedule => session.set_schedule(scheduled_at).await,
            PublishStep::Confirm => session.confirm().await,
        }
    }
}
