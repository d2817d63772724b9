use crate::error::FileError;
use crate::models::Article;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read one article file.
pub async fn load_article(path: &Path) -> Result<Article> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;

    let fallback_title = path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut article = Article::parse(&content, &fallback_title);
    article.source_path = Some(path.to_path_buf());
    Ok(article)
}

/// List every `*.txt` file in `folder`, sorted by file name.
pub async fn list_article_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: folder.display().to_string(),
        }
        .into());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: folder.display().to_string(),
            source,
        })?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Load every article in `folder`; unreadable files are skipped with a warning.
pub async fn load_all_articles(folder: &Path) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    for path in list_article_files(folder).await? {
        match load_article(&path).await {
            Ok(article) => {
                tracing::debug!(
                    "Loaded article: {}",
                    path.file_name().unwrap_or_default().to_string_lossy()
                );
                articles.push(article);
            }
            Err(e) => {
                tracing::warn!("{} 불러오기 실패: {}", path.display(), e);
            }
        }
    }
    Ok(articles)
}
