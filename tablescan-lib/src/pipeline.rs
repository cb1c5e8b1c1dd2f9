//! End-to-end workflows built from service operations
//!
//! - [`process_image`]: upload, start OCR and wait for it to finish
//! - [`download_with_recovery`]: download the spreadsheet, generating it first
//!   if the service has not done so yet

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::ImageUpload;
use crate::api::Spreadsheet;
use crate::api::TableService;
use crate::error::Error;
use crate::model::Task;
use crate::model::TaskId;
use crate::poll::OcrPoller;
use crate::poll::PollConfig;

/// Progress of [`process_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Uploading,
    /// The image was accepted as the given task; OCR is being started.
    StartingOcr(TaskId),
    Polling {
        attempt: u32,
        max: u32,
    },
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uploading => write!(f, "正在上传图片..."),
            Self::StartingOcr(_) => write!(f, "正在启动 OCR 识别..."),
            Self::Polling { attempt, max } => write!(f, "OCR 处理中... ({attempt}/{max})"),
            Self::Done => write!(f, "OCR 识别完成！"),
        }
    }
}

/// Uploads an image, starts OCR and waits for it to complete.
///
/// The image is validated locally first; an invalid image never reaches
/// the service. `on_stage` receives every stage change.
///
/// # Errors
///
/// Validation, service, OCR failure, timeout and cancellation errors are
/// returned as-is; see [`OcrPoller::wait_with_cancel`].
pub async fn process_image<S: TableService + ?Sized>(
    service: &S,
    image: &ImageUpload,
    config: &PollConfig,
    cancel: CancellationToken,
    mut on_stage: impl FnMut(&Stage),
) -> Result<Task, Error> {
    image.validate()?;

    report(&mut on_stage, Stage::Uploading);
    let uploaded = service.upload_image(image).await?;
    let task_id = uploaded.task_id;

    report(&mut on_stage, Stage::StartingOcr(task_id.clone()));
    service.start_ocr(&task_id).await?;

    let task = OcrPoller::new(service, &task_id, config.clone())
        .wait_with_cancel(cancel, |attempt, max| {
            on_stage(&Stage::Polling { attempt, max });
        })
        .await?;

    report(&mut on_stage, Stage::Done);
    Ok(task)
}

fn report(on_stage: &mut impl FnMut(&Stage), stage: Stage) {
    log::info!("{}", stage);
    on_stage(&stage);
}

/// Configuration for [`download_with_recovery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Delay between generating the spreadsheet and retrying the download.
    pub settle_delay: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(500),
        }
    }
}

impl RecoveryConfig {
    /// Sets the settle delay.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

/// Downloads the spreadsheet for a task.
///
/// If the first download fails with [`Error::NotGenerated`], the spreadsheet
/// is generated once, and after the settle delay the download is retried
/// once. Any other failure, and any failure of the recovery calls, is
/// returned unchanged.
pub async fn download_with_recovery<S: TableService + ?Sized>(
    service: &S,
    task_id: &TaskId,
    config: &RecoveryConfig,
) -> Result<Spreadsheet, Error> {
    match service.download_spreadsheet(task_id).await {
        Err(Error::NotGenerated(detail)) => {
            log::warn!("spreadsheet for task {task_id} not generated ({detail}), generating");
            service.generate_spreadsheet(task_id).await?;
            tokio::time::sleep(config.settle_delay).await;
            service.download_spreadsheet(task_id).await
        }
        result => result,
    }
}
