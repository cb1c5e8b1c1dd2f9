//! Service operations

mod excel;
mod execute;
mod service;
mod upload;

#[cfg(test)]
pub(crate) mod fake;

pub use excel::*;
pub use upload::*;

use async_trait::async_trait;

use crate::error::Error;
use crate::model::Document;
use crate::model::Task;
use crate::model::TaskId;

/// The operations of the remote recognition and export service.
///
/// [`TablescanClient`](crate::TablescanClient) implements this over HTTP. The
/// polling loop, the download recovery and the table session only depend on
/// this trait, so they can be driven by any implementation.
///
/// Every call is a single request; implementations must not retry.
#[async_trait]
pub trait TableService: Send + Sync {
    /// Uploads an image and creates a task for it.
    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadResponse, Error>;

    /// Starts OCR for an uploaded task.
    async fn start_ocr(&self, task_id: &TaskId) -> Result<(), Error>;

    /// Asks the service to pull OCR results; may advance the task status.
    async fn poll_ocr(&self, task_id: &TaskId) -> Result<(), Error>;

    /// Fetches the task, including its status and any error message.
    async fn get_task(&self, task_id: &TaskId) -> Result<Task, Error>;

    /// Fetches the recognized tables.
    async fn get_table_data(&self, task_id: &TaskId) -> Result<Document, Error>;

    /// Persists edited tables; the service regenerates the spreadsheet.
    async fn save_table_data(&self, task_id: &TaskId, document: &Document) -> Result<(), Error>;

    /// Generates the spreadsheet from the OCR result.
    async fn generate_spreadsheet(&self, task_id: &TaskId) -> Result<(), Error>;

    /// Downloads the generated spreadsheet.
    ///
    /// Fails with [`Error::NotGenerated`] if no spreadsheet exists yet.
    async fn download_spreadsheet(&self, task_id: &TaskId) -> Result<Spreadsheet, Error>;
}
