//! Failure log - capability layer
//!
//! Only knows how to append a failed publish item to a text file.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::PublishStatus;

/// Append-only log of items that could not be published.
pub struct FailureLog {
    file_path: String,
}

impl FailureLog {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    /// Append one line: `timestamp | label | status`.
    pub fn write(&self, label: &str, status: &PublishStatus) -> Result<()> {
        debug!("recording failure for {}: {}", label, status);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let line = format!(
            "{} | {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            label,
            status
        );
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PublishStep;

    #[test]
    fn appends_one_line_per_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("failures.txt");
        let log = FailureLog::with_path(path.to_string_lossy());

        let status = PublishStatus::Failed {
            step: Some(PublishStep::EnterBody),
            reason: "editor missing".to_string(),
        };
        log.write("a.txt", &status).unwrap();
        log.write("b.txt", &status).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("| a.txt | failed at enter body: editor missing"));
        assert!(lines[1].contains("| b.txt |"));
    }
}
