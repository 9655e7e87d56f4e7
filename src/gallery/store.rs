use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::utils::AppError;

/// Metadata recorded for one gallery upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub description: String,
    /// File name inside the upload directory
    pub file_name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Append-only JSON Lines log of [`UploadRecord`]s.
///
/// Each upload appends one line; nothing is ever rewritten, so concurrent
/// uploads cannot drop each other's records.
pub struct GalleryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl GalleryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, record: &UploadRecord) -> Result<(), AppError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| AppError::Io(format!("Failed to encode record: {}", e)))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }

    /// All records, newest first. A missing log is an empty gallery.
    pub async fn list(&self) -> Result<Vec<UploadRecord>, AppError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records: Vec<UploadRecord> = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("⚠️  Skipping malformed line {} in {}: {}", n + 1, self.path.display(), e);
                    None
                }
            })
            .collect();

        records.reverse();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(name: &str) -> UploadRecord {
        UploadRecord {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            description: String::new(),
            file_name: format!("{}.png", name),
            original_name: Some("cat.png".into()),
            size: 42,
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_missing_log_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = GalleryStore::new(dir.path().join("log.jsonl"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_list_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = GalleryStore::new(dir.path().join("log.jsonl"));

        store.append(&record("first")).await.unwrap();
        store.append(&record("second")).await.unwrap();

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(GalleryStore::new(dir.path().join("log.jsonl")));

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(&record(&format!("u{}", i))).await })
            })
            .collect();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let store = GalleryStore::new(&path);

        store.append(&record("ok")).await.unwrap();
        let mut file = tokio::fs::OpenOptions::new().append(true).open(&path).await.unwrap();
        file.write_all(b"{not json\n").await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ok");
    }
}
