use crate::error::FileError;
use crate::models::loaders::article_loader::list_article_files;
use crate::models::PublishItem;
use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Accepted formats for a schedule time, tried in order.
const SCHEDULE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a schedule time such as `2026-10-20 09:00`.
pub fn parse_schedule_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    SCHEDULE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Publish queue manifest.
///
/// ```toml
/// [[item]]
/// file = "rust_intro.txt"
/// at = "2026-10-20 09:00"
/// ```
#[derive(Debug, Deserialize)]
struct QueueManifest {
    #[serde(default, rename = "item")]
    items: Vec<ManifestItem>,
}

#[derive(Debug, Deserialize)]
struct ManifestItem {
    file: String,
    #[serde(deserialize_with = "deserialize_schedule")]
    at: NaiveDateTime,
}

fn deserialize_schedule<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_schedule_time(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid schedule time '{}', expected YYYY-MM-DD HH:MM",
            raw
        ))
    })
}

/// Load a TOML queue manifest. Relative `file` entries resolve against the
/// manifest's directory.
pub async fn load_queue_manifest(manifest_path: &Path) -> Result<Vec<PublishItem>> {
    let content = fs::read_to_string(manifest_path)
        .await
        .map_err(|source| FileError::ReadFailed {
            path: manifest_path.display().to_string(),
            source,
        })?;

    let manifest: QueueManifest =
        toml::from_str(&content).map_err(|source| FileError::ManifestParseFailed {
            path: manifest_path.display().to_string(),
            source,
        })?;

    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    Ok(manifest
        .items
        .into_iter()
        .map(|item| {
            let path = Path::new(&item.file);
            let resolved = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base.join(path)
            };
            PublishItem::new(resolved, item.at)
        })
        .collect())
}

/// Queue every article in `folder`: the i-th file (by name) is scheduled at
/// `start + i * interval`.
///
/// # Parameters
/// - `folder`: directory holding the `*.txt` articles
/// - `start`: schedule of the first file
/// - `interval`: gap between consecutive files
///
/// # Returns
/// The items in file-name order, or an error when a schedule falls outside
/// the representable date range
pub async fn queue_from_dir(
    folder: &Path,
    start: NaiveDateTime,
    interval: Duration,
) -> Result<Vec<PublishItem>> {
    let files = list_article_files(folder).await?;
    assign_schedule(files, start, interval)
}

fn assign_schedule(
    files: Vec<std::path::PathBuf>,
    start: NaiveDateTime,
    interval: Duration,
) -> Result<Vec<PublishItem>> {
    files
        .into_iter()
        .enumerate()
        .map(|(row, path)| -> Result<PublishItem> {
            let at = i32::try_from(row)
                .ok()
                .and_then(|row| interval.checked_mul(row))
                .and_then(|offset| start.checked_add_signed(offset))
                .with_context(|| {
                    format!(
                        "schedule of item {} ({}) is out of range",
                        row + 1,
                        path.display()
                    )
                })?;
            Ok(PublishItem::new(path, at))
        })
        .collect()
}
