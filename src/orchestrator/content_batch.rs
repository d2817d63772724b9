//! Content batch - orchestration layer
//!
//! Turns a list of titles into saved articles, one at a time.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use std::path::PathBuf;
use tracing::{error, info};

use crate::models::Article;
use crate::services::{ArticleStore, LlmService};
use crate::utils::logging::print_final_stats;

/// Anything that can write an article body for a title.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate_content(&self, title: &str, prompt: &str) -> Result<String>;
}

#[async_trait]
impl ContentGenerator for LlmService {
    async fn generate_content(&self, title: &str, prompt: &str) -> Result<String> {
        LlmService::generate_content(self, title, prompt).await
    }
}

/// Result of a content batch.
#[derive(Debug, Default)]
pub struct ContentReport {
    pub saved: Vec<PathBuf>,
    /// `(title, reason)`
    pub failed: Vec<(String, String)>,
}

impl ContentReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.failed.len()
    }
}

/// Generate and save an article for every title.
///
/// A failure on one title is logged and the next title is attempted.
pub async fn generate_articles<G>(
    generator: &G,
    store: &ArticleStore,
    titles: &[String],
    prompt: &str,
) -> ContentReport
where
    G: ContentGenerator + ?Sized,
{
    let total = titles.len();
    let mut report = ContentReport::default();
    info!("📚 글 {}개 생성 시작 (저장 위치: {})", total, store.dir().display());

    for (index, title) in titles.iter().enumerate() {
        info!("[{}/{}] {}", index + 1, total, title);

        match generate_one(generator, store, title, prompt).await {
            Ok(path) => {
                info!("[{}/{}] ✅ 저장 완료: {}", index + 1, total, path.display());
                report.saved.push(path);
            }
            Err(e) => {
                error!("[{}/{}] ❌ {:#}", index + 1, total, e);
                report.failed.push((title.clone(), format!("{:#}", e)));
            }
        }
    }

    print_final_stats(report.saved.len(), report.failed.len(), report.total());
    report
}

async fn generate_one<G>(
    generator: &G,
    store: &ArticleStore,
    title: &str,
    prompt: &str,
) -> Result<PathBuf>
where
    G: ContentGenerator + ?Sized,
{
    let body = generator.generate_content(title, prompt).await?;
    let article = Article::new(title, body, Local::now().naive_local());
    store.save(&article).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::Mutex;

    struct FakeGenerator {
        fail_on: &'static str,
        seen_prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentGenerator for FakeGenerator {
        async fn generate_content(&self, title: &str, prompt: &str) -> Result<String> {
            self.seen_prompts.lock().unwrap().push(prompt.to_string());
            if title == self.fail_on {
                bail!("quota exceeded");
            }
            Ok(format!("## {}\n본문", title))
        }
    }

    #[tokio::test]
    async fn failure_is_recorded_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());
        let generator = FakeGenerator {
            fail_on: "둘째",
            seen_prompts: Mutex::new(Vec::new()),
        };
        let titles = vec!["첫째".to_string(), "둘째".to_string(), "셋째".to_string()];

        let report = generate_articles(&generator, &store, &titles, "짧게").await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.saved.len(), 2);
        assert_eq!(report.failed, vec![("둘째".to_string(), "quota exceeded".to_string())]);
        assert_eq!(generator.seen_prompts.lock().unwrap().len(), 3);

        let saved = std::fs::read_to_string(&report.saved[1]).unwrap();
        assert!(saved.starts_with("제목: 셋째\n"));
        assert!(saved.ends_with("## 셋째\n본문"));
    }

    #[tokio::test]
    async fn empty_title_list_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("out"));
        let generator = FakeGenerator {
            fail_on: "",
            seen_prompts: Mutex::new(Vec::new()),
        };

        let report = generate_articles(&generator, &store, &[], "").await;
        assert_eq!(report.total(), 0);
        assert!(!dir.path().join("out").exists());
    }
}
