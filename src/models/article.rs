use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Label of the title line in a saved article.
pub const TITLE_PREFIX: &str = "제목:";
/// Label of the generation timestamp line in a saved article.
pub const GENERATED_AT_PREFIX: &str = "생성일시:";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between the header and the body of a saved article.
pub fn separator() -> String {
    "=".repeat(50)
}

/// A generated article, either fresh from the LLM or read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub generated_at: Option<NaiveDateTime>,
    pub body: String,
    pub source_path: Option<PathBuf>,
}

impl Article {
    pub fn new(title: impl Into<String>, body: impl Into<String>, generated_at: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            generated_at: Some(generated_at),
            body: body.into(),
            source_path: None,
        }
    }

    /// Serialize to the on-disk text format.
    pub fn render(&self) -> String {
        let generated_at = self
            .generated_at
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        format!(
            "{} {}\n{} {}\n{}\n\n{}",
            TITLE_PREFIX,
            self.title,
            GENERATED_AT_PREFIX,
            generated_at,
            separator(),
            self.body
        )
    }

    /// Parse the on-disk text format.
    ///
    /// Without a title line the whole file is the body and `fallback_title`
    /// (usually the file stem) becomes the title.
    pub fn parse(content: &str, fallback_title: &str) -> Self {
        let title = content
            .lines()
            .find_map(|line| line.strip_prefix(TITLE_PREFIX))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let Some(title) = title else {
            return Self {
                title: fallback_title.to_string(),
                generated_at: None,
                body: content.trim().to_string(),
                source_path: None,
            };
        };

        let generated_at = content
            .lines()
            .find_map(|line| line.strip_prefix(GENERATED_AT_PREFIX))
            .and_then(|t| NaiveDateTime::parse_from_str(t.trim(), TIMESTAMP_FORMAT).ok());

        let sep = separator();
        let body = match content.find(&sep) {
            Some(pos) => content[pos + sep.len()..].trim().to_string(),
            None => content.trim().to_string(),
        };

        Self {
            title,
            generated_at,
            body,
            source_path: None,
        }
    }
}
