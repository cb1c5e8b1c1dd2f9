//! In-memory [`TableService`] for tests

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::ImageUpload;
use super::NOT_GENERATED_DETAIL;
use super::Spreadsheet;
use super::TableService;
use super::UploadResponse;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Document;
use crate::model::Task;
use crate::model::TaskId;
use crate::model::TaskStatus;

/// Number of calls made to each operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Calls {
    pub upload_image: u32,
    pub start_ocr: u32,
    pub poll_ocr: u32,
    pub get_task: u32,
    pub get_table_data: u32,
    pub save_table_data: u32,
    pub generate_spreadsheet: u32,
    pub download_spreadsheet: u32,
}

struct State {
    /// Statuses returned by successive `get_task` calls; the last one repeats.
    statuses: VecDeque<TaskStatus>,
    last_status: TaskStatus,
    error_message: Option<String>,
    document: Document,
    saved: Option<Document>,
    generated: bool,
    generate_works: bool,
    fail_save: bool,
    calls: Calls,
}

/// Scripted service double that counts every call.
pub(crate) struct FakeService {
    state: Mutex<State>,
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                statuses: VecDeque::new(),
                last_status: TaskStatus::OcrProcessing,
                error_message: None,
                document: Document::new("task-1", "ocr_done"),
                saved: None,
                generated: false,
                generate_works: true,
                fail_save: false,
                calls: Calls::default(),
            }),
        }
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        {
            let mut state = self.state.try_lock().unwrap();
            state.statuses = statuses.into_iter().collect();
            if let Some(last) = state.statuses.back() {
                state.last_status = *last;
            }
        }
        self
    }

    pub fn with_error_message(self, message: &str) -> Self {
        self.state.try_lock().unwrap().error_message = Some(message.to_string());
        self
    }

    pub fn with_document(self, document: Document) -> Self {
        self.state.try_lock().unwrap().document = document;
        self
    }

    /// The spreadsheet already exists.
    pub fn generated(self) -> Self {
        self.state.try_lock().unwrap().generated = true;
        self
    }

    /// Generation is acknowledged but never produces a file.
    pub fn generate_without_effect(self) -> Self {
        self.state.try_lock().unwrap().generate_works = false;
        self
    }

    pub fn failing_save(self) -> Self {
        self.state.try_lock().unwrap().fail_save = true;
        self
    }

    pub async fn calls(&self) -> Calls {
        self.state.lock().await.calls.clone()
    }

    pub async fn saved(&self) -> Option<Document> {
        self.state.lock().await.saved.clone()
    }
}

#[async_trait]
impl TableService for FakeService {
    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadResponse, Error> {
        let mut state = self.state.lock().await;
        state.calls.upload_image += 1;
        Ok(UploadResponse {
            task_id: state.document.task_id.clone(),
            image_path: Some(format!("data/images/{}", image.file_name)),
            message: Some("上传成功".to_string()),
        })
    }

    async fn start_ocr(&self, _task_id: &TaskId) -> Result<(), Error> {
        self.state.lock().await.calls.start_ocr += 1;
        Ok(())
    }

    async fn poll_ocr(&self, _task_id: &TaskId) -> Result<(), Error> {
        self.state.lock().await.calls.poll_ocr += 1;
        Ok(())
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, Error> {
        let mut state = self.state.lock().await;
        state.calls.get_task += 1;
        let status = state.statuses.pop_front().unwrap_or(state.last_status);
        let mut task = Task::new(task_id.clone(), status);
        task.error_message = state.error_message.clone();
        Ok(task)
    }

    async fn get_table_data(&self, _task_id: &TaskId) -> Result<Document, Error> {
        let mut state = self.state.lock().await;
        state.calls.get_table_data += 1;
        Ok(state.document.clone())
    }

    async fn save_table_data(&self, _task_id: &TaskId, document: &Document) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls.save_table_data += 1;
        if state.fail_save {
            return Err(ApiError::http(500, "保存表格数据失败: Internal Server Error").into());
        }
        state.saved = Some(document.clone());
        Ok(())
    }

    async fn generate_spreadsheet(&self, _task_id: &TaskId) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls.generate_spreadsheet += 1;
        if state.generate_works {
            state.generated = true;
        }
        Ok(())
    }

    async fn download_spreadsheet(&self, task_id: &TaskId) -> Result<Spreadsheet, Error> {
        let mut state = self.state.lock().await;
        state.calls.download_spreadsheet += 1;
        if !state.generated {
            return Err(Error::NotGenerated(NOT_GENERATED_DETAIL.to_string()));
        }
        Ok(Spreadsheet {
            file_name: Spreadsheet::default_file_name(task_id),
            bytes: b"PK\x03\x04".to_vec(),
        })
    }
}
