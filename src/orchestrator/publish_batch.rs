//! Publish batch - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Validation**: reject the whole queue if any item is not in the future
//! 2. **Loading**: read each item's article right before publishing it
//! 3. **Sequencing**: items are published one by one through one session
//! 4. **Bookkeeping**: per-item status, failure log, final statistics
//!
//! The browser itself is opened and owned by the caller; this module only
//! sees it as an [`EditorSession`].

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::models::{load_article, PublishItem, PublishStatus, Visibility};
use crate::orchestrator::schedule::validate_schedule;
use crate::services::FailureLog;
use crate::utils::logging::print_final_stats;
use crate::workflow::{EditorSession, PublishCtx, PublishFlow};

/// Outcome of a publish batch, in queue order.
#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<(PublishItem, PublishStatus)>,
}

impl PublishReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, s)| s.is_published()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// Status observer: `(queue index, item, new status)`.
pub type ProgressFn = Box<dyn Fn(usize, &PublishItem, &PublishStatus) + Send + Sync>;

/// Publish batch
pub struct PublishBatch {
    flow: PublishFlow,
    failure_log: Option<FailureLog>,
    progress: Option<ProgressFn>,
}

impl PublishBatch {
    pub fn new(config: &Config, visibility: Visibility) -> Self {
        Self {
            flow: PublishFlow::new(config, visibility),
            failure_log: Some(FailureLog::with_path(&config.failure_log_file)),
            progress: None,
        }
    }

    pub fn with_flow(flow: PublishFlow, failure_log: Option<FailureLog>) -> Self {
        Self {
            flow,
            failure_log,
            progress: None,
        }
    }

    /// Report every status change of every item.
    ///
    /// All items are reported `Pending` once the schedule is accepted, then
    /// each moves to `Preparing` and finally to `Published` or `Failed`.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Publish every item in order.
    ///
    /// # Parameters
    /// - `session`: editor used for every item; reset after each one
    /// - `items`: queue in publishing order
    /// - `now`: reference time for the future-schedule check
    ///
    /// # Returns
    /// `Err` only when the schedule is rejected; item failures are recorded
    /// in the report and the batch moves on.
    pub async fn run<S>(
        &self,
        session: &mut S,
        items: Vec<PublishItem>,
        now: NaiveDateTime,
    ) -> Result<PublishReport>
    where
        S: EditorSession + ?Sized,
    {
        if items.is_empty() {
            warn!("⚠️ 발행할 글이 없습니다");
            return Ok(PublishReport::default());
        }

        validate_schedule(&items, now)?;

        let total = items.len();
        info!("📋 예약 대기 {}건", total);

        let mut statuses = vec![PublishStatus::Pending; total];
        for (index, item) in items.iter().enumerate() {
            self.notify(index, item, &statuses[index]);
        }

        for (index, item) in items.iter().enumerate() {
            let ctx = PublishCtx::new(index + 1, total, &item.label);
            statuses[index] = PublishStatus::Preparing;
            self.notify(index, item, &statuses[index]);
            info!("[{}/{}] {}", index + 1, total, item.label);

            let status = self.publish_one(session, &ctx, item).await;

            if let PublishStatus::Failed { .. } = &status {
                self.record_failure(&item.label, &status);
            }
            statuses[index] = status;
            self.notify(index, item, &statuses[index]);
        }

        let report = PublishReport {
            outcomes: items.into_iter().zip(statuses).collect(),
        };
        print_final_stats(report.succeeded(), report.failed(), report.total());
        Ok(report)
    }

    async fn publish_one<S>(&self, session: &mut S, ctx: &PublishCtx, item: &PublishItem) -> PublishStatus
    where
        S: EditorSession + ?Sized,
    {
        let article = match load_article(&item.article_path).await {
            Ok(article) => article,
            Err(e) => {
                error!("{} ❌ 글 파일을 읽을 수 없습니다: {:#}", ctx, e);
                return PublishStatus::Failed {
                    step: None,
                    reason: format!("{:#}", e),
                };
            }
        };

        if article.body.trim().is_empty() {
            warn!("{} ❌ 본문이 비어 있습니다", ctx);
            return PublishStatus::Failed {
                step: None,
                reason: "article body is empty".to_string(),
            };
        }

        self.flow.run(session, ctx, &article, item.scheduled_at).await
    }

    fn notify(&self, index: usize, item: &PublishItem, status: &PublishStatus) {
        if let Some(progress) = &self.progress {
            progress(index, item, status);
        }
    }

    fn record_failure(&self, label: &str, status: &PublishStatus) {
        if let Some(log) = &self.failure_log {
            if let Err(e) = log.write(label, status) {
                warn!("⚠️ 실패 기록 저장 실패: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, PublishError};
    use crate::models::{Article, PublishStep};
    use crate::workflow::testing::ScriptedSession;
    use chrono::{Duration, NaiveDate};
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn write_article(dir: &Path, name: &str, title: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, Article::new(title, body, at(0, 0)).render()).unwrap();
        path
    }

    fn batch(failure_log: Option<FailureLog>) -> PublishBatch {
        let flow = PublishFlow::with_step_timeout(Visibility::Public, std::time::Duration::from_secs(5));
        PublishBatch::with_flow(flow, failure_log)
    }

    #[tokio::test]
    async fn empty_queue_is_not_an_error() {
        let mut session = ScriptedSession::new();
        let report = batch(None).run(&mut session, Vec::new(), at(9, 0)).await.unwrap();
        assert_eq!(report.total(), 0);
        assert!(session.calls.is_empty());
    }

    #[tokio::test]
    async fn past_item_blocks_whole_batch() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_article(dir.path(), "a.txt", "A", "body");
        let b = write_article(dir.path(), "b.txt", "B", "body");
        let items = vec![PublishItem::new(a, at(10, 0)), PublishItem::new(b, at(8, 0))];

        let mut session = ScriptedSession::new();
        let err = batch(None).run(&mut session, items, at(9, 0)).await.unwrap_err();

        match err.downcast_ref::<PublishError>() {
            Some(PublishError::ScheduleInPast { offending }) => {
                assert_eq!(offending.len(), 1);
                assert!(offending[0].starts_with("b.txt"));
            }
            other => panic!("unexpected error: {:?} / {:?}", other, err.downcast_ref::<AppError>()),
        }
        assert!(session.calls.is_empty());
    }

    #[tokio::test]
    async fn failed_item_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("failures.txt");
        let start = at(10, 0);
        let items: Vec<_> = ["a.txt", "b.txt", "c.txt"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let path = write_article(dir.path(), name, &format!("제목 {}", i), "본문");
                PublishItem::new(path, start + Duration::minutes(5 * i as i64))
            })
            .collect();

        let mut session = ScriptedSession::failing_at(2, PublishStep::SetSchedule);
        let report = batch(Some(FailureLog::with_path(log_path.to_string_lossy())))
            .run(&mut session, items, at(9, 0))
            .await
            .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(
            report.outcomes[1].1,
            PublishStatus::Failed {
                step: Some(PublishStep::SetSchedule),
                reason: "scripted failure".to_string(),
            }
        );
        assert_eq!(session.reset_count(), 3);
        assert_eq!(session.titles, vec!["제목 0", "제목 1", "제목 2"]);
        assert_eq!(session.schedules, vec![at(10, 0), at(10, 10)]);

        let log = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("| b.txt | failed at set schedule"));
    }

    #[tokio::test]
    async fn unreadable_or_empty_article_fails_without_touching_browser() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_article(dir.path(), "empty.txt", "빈 글", "   ");
        let items = vec![
            PublishItem::new(dir.path().join("missing.txt"), at(10, 0)),
            PublishItem::new(empty, at(10, 5)),
        ];

        let mut session = ScriptedSession::new();
        let report = batch(None).run(&mut session, items, at(9, 0)).await.unwrap();

        assert_eq!(report.failed(), 2);
        for (_, status) in &report.outcomes {
            assert!(matches!(status, PublishStatus::Failed { step: None, .. }));
        }
        assert!(session.calls.is_empty());
    }

    #[tokio::test]
    async fn progress_reports_every_status_change() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_article(dir.path(), "a.txt", "A", "body");
        let b = write_article(dir.path(), "b.txt", "B", "body");
        let items = vec![PublishItem::new(a, at(10, 0)), PublishItem::new(b, at(10, 5))];

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress: ProgressFn = Box::new(move |index, _item, status| {
            sink.lock().unwrap().push((index, status.to_string()));
        });

        let mut session = ScriptedSession::failing_at(2, PublishStep::EnterBody);
        batch(None)
            .with_progress(progress)
            .run(&mut session, items, at(9, 0))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        let states: Vec<_> = seen.iter().map(|(i, s)| format!("{}:{}", i, s)).collect();
        assert_eq!(&states[..5], &["0:pending", "1:pending", "0:preparing", "0:published", "1:preparing"]);
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[5].0, 1);
        assert!(seen[5].1.starts_with("failed"), "{}", seen[5].1);
    }

    #[tokio::test]
    async fn rejected_schedule_reports_no_progress() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_article(dir.path(), "a.txt", "A", "body");
        let calls = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&calls);

        let mut session = ScriptedSession::new();
        let result = batch(None)
            .with_progress(Box::new(move |_, _, _| *sink.lock().unwrap() += 1))
            .run(&mut session, vec![PublishItem::new(a, at(9, 0))], at(9, 0))
            .await;

        assert!(result.is_err());
        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
