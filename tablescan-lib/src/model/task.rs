//! Processing task and its lifecycle status

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identifier of a processing task, assigned by the service on upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a task ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Lifecycle status of a task, owned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Uploaded,
    OcrProcessing,
    OcrDone,
    OcrFailed,
    ExcelGenerated,
    ExcelFailed,
    Editable,
}

impl TaskStatus {
    /// Returns the wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::OcrProcessing => "ocr_processing",
            Self::OcrDone => "ocr_done",
            Self::OcrFailed => "ocr_failed",
            Self::ExcelGenerated => "excel_generated",
            Self::ExcelFailed => "excel_failed",
            Self::Editable => "editable",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A processing task as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    pub status: TaskStatus,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub ocr_json_path: Option<String>,
    #[serde(default)]
    pub excel_path: Option<String>,
    #[serde(default)]
    pub ocr_job_id: Option<String>,
    /// Failure reason, set when the status is one of the `*_failed` variants.
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task with the given status and both timestamps set to now.
    pub fn new(task_id: impl Into<TaskId>, status: TaskStatus) -> Self {
        let now = Utc::now();
        Self {
            task_id: task_id.into(),
            status,
            image_path: None,
            ocr_json_path: None,
            excel_path: None,
            ocr_job_id: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the error message.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

/// The service emits naive UTC timestamps (`2024-05-01T08:30:00.123456`);
/// RFC 3339 is accepted as well.
mod timestamp {
    use chrono::DateTime;
    use chrono::NaiveDateTime;
    use chrono::Utc;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if let Ok(value) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(value.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::Timelike;

    use super::*;

    #[test]
    fn test_status_wire_names() {
        let status: TaskStatus = serde_json::from_str("\"ocr_processing\"").unwrap();
        assert_eq!(status, TaskStatus::OcrProcessing);
        assert_eq!(
            serde_json::to_string(&TaskStatus::ExcelGenerated).unwrap(),
            "\"excel_generated\""
        );
        assert_eq!(TaskStatus::OcrDone.to_string(), "ocr_done");
    }

    #[test]
    fn test_deserialize_naive_timestamps() {
        let json = r#"{
            "task_id": "abc",
            "status": "ocr_failed",
            "image_path": "data/images/abc.png",
            "ocr_json_path": null,
            "excel_path": null,
            "ocr_job_id": "job-1",
            "error_message": "识别失败",
            "created_at": "2024-05-01T08:30:00.123456",
            "updated_at": "2024-05-01T08:31:02"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.status, TaskStatus::OcrFailed);
        assert_eq!(task.error_message.as_deref(), Some("识别失败"));
        assert_eq!(task.created_at.year(), 2024);
        assert_eq!(task.updated_at.minute(), 31);
        assert_eq!(task.updated_at.second(), 2);
    }

    #[test]
    fn test_deserialize_rfc3339_timestamps() {
        let json = r#"{
            "task_id": "abc",
            "status": "uploaded",
            "created_at": "2024-05-01T10:30:00+02:00",
            "updated_at": "2024-05-01T08:30:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();

        assert_eq!(task.created_at, task.updated_at);
        assert!(task.image_path.is_none());
    }
}
