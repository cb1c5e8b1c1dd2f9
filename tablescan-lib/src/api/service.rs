//! HTTP implementation of [`TableService`]

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::Form;
use reqwest::multipart::Part;

use super::ImageUpload;
use super::Spreadsheet;
use super::TableService;
use super::UploadResponse;
use super::excel::is_not_generated;
use super::excel::parse_content_disposition;
use crate::TablescanClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Document;
use crate::model::Task;
use crate::model::TaskId;

#[async_trait]
impl TableService for TablescanClient {
    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadResponse, Error> {
        image.validate()?;
        let mime = image.mime_type().unwrap_or("application/octet-stream");
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(mime)
            .map_err(ApiError::from)?;
        let form = Form::new().part("file", part);

        let url = self.build_url("/upload/image");
        let response: UploadResponse = self
            .send_json(self.request(Method::POST, &url).multipart(form), "上传失败")
            .await?;
        log::debug!("uploaded {} as task {}", image.file_name, response.task_id);
        Ok(response)
    }

    async fn start_ocr(&self, task_id: &TaskId) -> Result<(), Error> {
        let url = self.task_url("/ocr/start", task_id);
        self.send_ack(self.request(Method::POST, &url), "启动 OCR 失败")
            .await
    }

    async fn poll_ocr(&self, task_id: &TaskId) -> Result<(), Error> {
        let url = self.task_url("/ocr/poll", task_id);
        self.send_ack(self.request(Method::POST, &url), "获取 OCR 结果失败")
            .await
    }

    async fn get_task(&self, task_id: &TaskId) -> Result<Task, Error> {
        let url = self.task_url("/tasks", task_id);
        self.send_json(self.request(Method::GET, &url), "获取任务失败")
            .await
    }

    async fn get_table_data(&self, task_id: &TaskId) -> Result<Document, Error> {
        let url = self.task_url("/table/data", task_id);
        self.send_json(self.request(Method::GET, &url), "获取表格数据失败")
            .await
    }

    async fn save_table_data(&self, task_id: &TaskId, document: &Document) -> Result<(), Error> {
        let url = self.task_url("/table/save", task_id);
        let request = self.request(Method::POST, &url).json(document);
        self.send_ack(request, "保存表格数据失败").await
    }

    async fn generate_spreadsheet(&self, task_id: &TaskId) -> Result<(), Error> {
        let url = self.task_url("/excel/generate", task_id);
        self.send_ack(self.request(Method::POST, &url), "生成 Excel 失败")
            .await
    }

    async fn download_spreadsheet(&self, task_id: &TaskId) -> Result<Spreadsheet, Error> {
        let url = self.task_url("/excel/download", task_id);
        let response = match self
            .send(self.request(Method::GET, &url), "下载 Excel 失败")
            .await
        {
            Ok(response) => response,
            Err(Error::Api(ApiError::Http { status, message }))
                if is_not_generated(status, &message) =>
            {
                return Err(Error::NotGenerated(message));
            }
            Err(e) => return Err(e),
        };

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_disposition)
            .unwrap_or_else(|| Spreadsheet::default_file_name(task_id));
        let bytes = response.bytes().await.map_err(ApiError::from)?;

        Ok(Spreadsheet {
            file_name,
            bytes: bytes.to_vec(),
        })
    }
}
