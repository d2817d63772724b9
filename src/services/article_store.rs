//! Article store - capability layer
//!
//! Only knows how to write a generated article to disk.

use crate::error::FileError;
use crate::models::Article;
use crate::utils::sanitize_filename;
use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Writes articles as `<sanitized title>_<YYYYmmdd_HHMMSS>.txt`.
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `article`, creating the directory when needed.
    ///
    /// # Returns
    /// Path of the written file
    pub async fn save(&self, article: &Article) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| FileError::WriteFailed {
                path: self.dir.display().to_string(),
                source,
            })?;

        let path = self.unused_path(&file_stem(article)).await;
        debug!("writing article to {}", path.display());

        fs::write(&path, article.render())
            .await
            .map_err(|source| FileError::WriteFailed {
                path: path.display().to_string(),
                source,
            })?;

        Ok(path)
    }

    /// Two titles generated within the same second must not overwrite each other.
    async fn unused_path(&self, stem: &str) -> PathBuf {
        let mut candidate = self.dir.join(format!("{}.txt", stem));
        let mut n = 1;
        while fs::try_exists(&candidate).await.unwrap_or(false) {
            candidate = self.dir.join(format!("{}_{}.txt", stem, n));
            n += 1;
        }
        candidate
    }
}

fn file_stem(article: &Article) -> String {
    let stamp = article
        .generated_at
        .unwrap_or_else(|| Local::now().naive_local())
        .format("%Y%m%d_%H%M%S");
    let safe_title = sanitize_filename(&article.title);
    let safe_title = if safe_title.is_empty() {
        "article".to_string()
    } else {
        safe_title
    };
    format!("{}_{}", safe_title, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str) -> Article {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        Article::new(title, "## 본문", at)
    }

    #[tokio::test]
    async fn save_writes_rendered_article_with_sanitized_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("out"));

        let path = store.save(&article("러스트: 입문?")).await.unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "러스트 입문_20261019_140509.txt"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("제목: 러스트: 입문?\n"));
        assert!(content.ends_with("## 본문"));
    }

    #[tokio::test]
    async fn save_does_not_overwrite_same_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path());

        let first = store.save(&article("같은 제목")).await.unwrap();
        let second = store.save(&article("같은 제목")).await.unwrap();

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("_1.txt"));
    }

    #[test]
    fn symbol_only_title_gets_placeholder_name() {
        assert_eq!(file_stem(&article("???")), "article_20261019_140509");
    }
}
