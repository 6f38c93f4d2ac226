use crate::domain::lesson::{LessonEntry, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Read-only access to lesson records keyed by date
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Find the lesson for `date`; a missing record is `Ok(None)`
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<LessonEntry>, StoreError>;
}

/// Lessons stored as a JSON array of records, each carrying a `date` key
pub struct JsonLessonRepository {
    path: PathBuf,
}

impl JsonLessonRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, source: serde_json::Error) -> StoreError {
        StoreError::Malformed {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl LessonRepository for JsonLessonRepository {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Option<LessonEntry>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "Lesson data file not found");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        // Records are matched on the raw value first so one malformed
        // record does not hide the others
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&raw).map_err(|e| self.malformed(e))?;
        let key = date.format("%Y-%m-%d").to_string();

        let Some(record) = records
            .into_iter()
            .find(|record| record.get("date").and_then(serde_json::Value::as_str) == Some(key.as_str()))
        else {
            tracing::info!(date = %key, "No lesson entry for date");
            return Ok(None);
        };

        let entry: LessonEntry = serde_json::from_value(record).map_err(|e| self.malformed(e))?;
        tracing::debug!(date = %key, path = %self.path.display(), "Lesson entry loaded");

        Ok(Some(entry))
    }
}
