//! Waiting for OCR completion
//!
//! OCR runs on the service; the client repeatedly checks the task status and
//! nudges the service to pull results until the task is done, has failed,
//! or the attempt budget runs out.
//!
//! # Example
//!
//! ```ignore
//! use tablescan_lib::poll::{OcrPoller, PollConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let task = OcrPoller::new(&client, &task_id, PollConfig::default())
//!     .wait_with_cancel(cancel.clone(), |attempt, max| {
//!         println!("OCR 处理中... ({attempt}/{max})");
//!     })
//!     .await?;
//! ```

mod config;

pub use config::*;

use tokio_util::sync::CancellationToken;

use crate::api::TableService;
use crate::error::Error;
use crate::model::Task;
use crate::model::TaskId;
use crate::model::TaskStatus;

/// Message used when the service reports a failure without a reason.
pub const OCR_FAILED_FALLBACK: &str = "OCR 识别失败";

/// Result of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    /// OCR finished; the task is returned.
    Done(Task),
    /// OCR failed with the given message.
    Failed(String),
    /// Still in progress (any other status).
    Pending(TaskStatus),
}

/// Polls a single task until OCR completes.
pub struct OcrPoller<'a, S: TableService + ?Sized> {
    service: &'a S,
    task_id: &'a TaskId,
    config: PollConfig,
}

impl<'a, S: TableService + ?Sized> OcrPoller<'a, S> {
    pub fn new(service: &'a S, task_id: &'a TaskId, config: PollConfig) -> Self {
        Self {
            service,
            task_id,
            config,
        }
    }

    /// Checks the task status once.
    pub async fn check(&self) -> Result<CheckResult, Error> {
        let task = self.service.get_task(self.task_id).await?;
        Ok(match task.status {
            TaskStatus::OcrDone => CheckResult::Done(task),
            TaskStatus::OcrFailed => CheckResult::Failed(
                task.error_message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| OCR_FAILED_FALLBACK.to_string()),
            ),
            status => CheckResult::Pending(status),
        })
    }

    /// Waits for OCR to finish.
    ///
    /// `on_attempt(attempt, max_attempts)` is called before every status
    /// check, with `attempt` starting at 1.
    pub async fn wait(self, on_attempt: impl FnMut(u32, u32)) -> Result<Task, Error> {
        self.wait_with_cancel(CancellationToken::new(), on_attempt)
            .await
    }

    /// Waits for OCR to finish with cancellation support.
    ///
    /// Each attempt checks the status; a pending task is followed by a wait
    /// of `interval` and one poll trigger. No wait or trigger follows the
    /// final check.
    ///
    /// # Errors
    ///
    /// - [`Error::OcrFailed`] when the task reports `ocr_failed`
    /// - [`Error::Timeout`] after `max_attempts` pending checks
    /// - [`Error::Cancelled`] as soon as `cancel` fires
    /// - any service error from a check or a poll trigger
    pub async fn wait_with_cancel(
        self,
        cancel: CancellationToken,
        mut on_attempt: impl FnMut(u32, u32),
    ) -> Result<Task, Error> {
        let max = self.config.max_attempts;

        for attempt in 1..=max {
            on_attempt(attempt, max);

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = self.check() => result?,
            };

            match result {
                CheckResult::Done(task) => {
                    log::debug!("task {} finished OCR after {} checks", self.task_id, attempt);
                    return Ok(task);
                }
                CheckResult::Failed(message) => return Err(Error::OcrFailed(message)),
                CheckResult::Pending(status) => {
                    log::debug!(
                        "task {} is {} (check {}/{})",
                        self.task_id,
                        status,
                        attempt,
                        max
                    );
                }
            }

            if attempt == max {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(self.config.interval) => {}
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = self.service.poll_ocr(self.task_id) => result?,
            }
        }

        Err(Error::Timeout { attempts: max })
    }
}

/// Waits for OCR on `task_id` using `config`.
///
/// Shorthand for [`OcrPoller::wait_with_cancel`].
pub async fn wait_for_ocr<S: TableService + ?Sized>(
    service: &S,
    task_id: &TaskId,
    config: &PollConfig,
    cancel: CancellationToken,
    on_attempt: impl FnMut(u32, u32),
) -> Result<Task, Error> {
    OcrPoller::new(service, task_id, config.clone())
        .wait_with_cancel(cancel, on_attempt)
        .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::api::fake::FakeService;

    fn config(max_attempts: u32) -> PollConfig {
        PollConfig::default()
            .max_attempts(max_attempts)
            .interval(Duration::from_secs(2))
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_on_third_check() {
        let service = FakeService::new().with_statuses([
            TaskStatus::OcrProcessing,
            TaskStatus::OcrProcessing,
            TaskStatus::OcrDone,
        ]);
        let task_id = TaskId::new("task-1");
        let mut attempts = Vec::new();

        let task = OcrPoller::new(&service, &task_id, config(30))
            .wait(|attempt, max| attempts.push((attempt, max)))
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::OcrDone);
        assert_eq!(attempts, vec![(1, 30), (2, 30), (3, 30)]);
        let calls = service.calls().await;
        assert_eq!(calls.get_task, 3);
        assert_eq!(calls.poll_ocr, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_after_max_attempts() {
        let service = FakeService::new().with_statuses([TaskStatus::OcrProcessing]);
        let task_id = TaskId::new("task-1");
        let started = tokio::time::Instant::now();

        let err = OcrPoller::new(&service, &task_id, config(5))
            .wait(|_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout { attempts: 5 }));
        assert_eq!(service.calls().await.get_task, 5);
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_carries_message() {
        let service = FakeService::new()
            .with_statuses([TaskStatus::OcrProcessing, TaskStatus::OcrFailed])
            .with_error_message("图片无法识别");
        let task_id = TaskId::new("task-1");

        let err = OcrPoller::new(&service, &task_id, config(30))
            .wait(|_, _| {})
            .await
            .unwrap_err();

        match err {
            Error::OcrFailed(message) => assert_eq!(message, "图片无法识别"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(service.calls().await.get_task, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_without_message_uses_fallback() {
        let service = FakeService::new().with_statuses([TaskStatus::OcrFailed]);
        let task_id = TaskId::new("task-1");

        let err = wait_for_ocr(&service, &task_id, &config(3), CancellationToken::new(), |_, _| {})
            .await
            .unwrap_err();

        assert_eq!(err.detail(), OCR_FAILED_FALLBACK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_statuses_keep_polling() {
        let service = FakeService::new().with_statuses([
            TaskStatus::Uploaded,
            TaskStatus::ExcelGenerated,
            TaskStatus::Editable,
            TaskStatus::OcrDone,
        ]);
        let task_id = TaskId::new("task-1");

        let task = wait_for_ocr(&service, &task_id, &config(10), CancellationToken::new(), |_, _| {})
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::OcrDone);
        assert_eq!(service.calls().await.get_task, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_start() {
        let service = FakeService::new();
        let task_id = TaskId::new("task-1");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = wait_for_ocr(&service, &task_id, &config(30), cancel, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(service.calls().await.get_task, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_while_waiting() {
        let service = FakeService::new().with_statuses([TaskStatus::OcrProcessing]);
        let task_id = TaskId::new("task-1");
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            trigger.cancel();
        });

        let err = wait_for_ocr(&service, &task_id, &config(30), cancel, |_, _| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        let calls = service.calls().await;
        assert_eq!(calls.get_task, 2);
        assert_eq!(calls.poll_ocr, 1);
    }
}
