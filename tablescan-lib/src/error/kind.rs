//! User-facing error classification
//!
//! Every failure surfaced to a user is classified into one [`ErrorKind`] and
//! rendered as a [`Notice`]: a friendly message, a remedial suggestion and an
//! icon. Messages are in Chinese, matching the rest of the product.

use std::fmt;

use super::ApiError;
use super::Error;

/// Category of a user-visible failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Upload,
    Ocr,
    Timeout,
    Validation,
    Server,
    Unknown,
}

impl ErrorKind {
    /// Classifies an error.
    ///
    /// Typed variants map directly; everything else is classified by
    /// inspecting its message, see [`ErrorKind::from_message`].
    pub fn classify(error: &Error) -> Self {
        match error {
            Error::Api(ApiError::Network(_)) => Self::Network,
            Error::InvalidImage(_) => Self::Upload,
            Error::OcrFailed(_) => Self::Ocr,
            Error::Timeout { .. } => Self::Timeout,
            Error::Validation(_) => Self::Validation,
            other => Self::from_message(&other.to_string(), other.status_code()),
        }
    }

    /// Classifies a failure from its message and optional HTTP status.
    ///
    /// Fragments are checked in order; the first match wins. A status of 500
    /// or above only decides when no fragment matched.
    pub fn from_message(message: &str, status: Option<u16>) -> Self {
        const FRAGMENTS: &[(&[&str], ErrorKind)] = &[
            (&["fetch", "Network"], ErrorKind::Network),
            (&["upload", "上传"], ErrorKind::Upload),
            (&["OCR", "识别"], ErrorKind::Ocr),
            (&["timeout", "超时"], ErrorKind::Timeout),
            (&["validation", "验证"], ErrorKind::Validation),
        ];

        for (needles, kind) in FRAGMENTS {
            if needles.iter().any(|needle| message.contains(needle)) {
                return *kind;
            }
        }

        match status {
            Some(status) if status >= 500 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Returns the remedial suggestion shown under the message.
    pub fn suggestion(self) -> &'static str {
        match self {
            Self::Network => "建议：检查网络连接后重试",
            Self::Upload => "建议：检查文件格式和大小，重新上传",
            Self::Ocr => "建议：使用清晰度更高的图片，或稍后重试",
            Self::Timeout => "建议：请稍后重试，或联系技术支持",
            Self::Validation => "建议：检查输入参数是否正确",
            Self::Server => "建议：服务器正在处理中，请稍后重试",
            Self::Unknown => "建议：刷新页面或联系技术支持",
        }
    }

    /// Returns the icon shown next to the notice.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Network => "🌐",
            Self::Upload => "📤",
            Self::Ocr => "🔍",
            Self::Timeout => "⏱️",
            Self::Validation => "⚠️",
            Self::Server => "🔧",
            Self::Unknown => "❌",
        }
    }

    /// Returns `false` for kinds where repeating the same call cannot help.
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Upload | Self::Validation)
    }

    /// Returns the stable name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Upload => "upload",
            Self::Ocr => "ocr",
            Self::Timeout => "timeout",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known technical message fragments and their friendly replacements.
///
/// Status-code keys are matched as substrings of the message too.
const KNOWN_MESSAGES: &[(&str, &str)] = &[
    ("Failed to fetch", "网络连接失败，请检查网络设置"),
    ("Network request failed", "网络请求失败，请稍后重试"),
    ("NetworkError", "网络错误，请检查您的网络连接"),
    ("Network error", "网络错误，请检查您的网络连接"),
    ("File too large", "文件过大，请选择小于 10MB 的图片"),
    ("Invalid file type", "不支持的文件格式，请上传图片文件"),
    ("Upload failed", "上传失败，请重试"),
    ("OCR task creation failed", "OCR 任务创建失败，请稍后重试"),
    ("OCR recognition failed", "OCR 识别失败，请尝试使用清晰度更高的图片"),
    ("OCR timeout", "OCR 识别超时，请稍后重试"),
    ("500", "服务器内部错误，请稍后重试"),
    ("502", "服务器网关错误，请稍后重试"),
    ("503", "服务暂时不可用，请稍后重试"),
    ("400", "请求参数错误"),
    ("401", "未授权，请重新登录"),
    ("403", "没有权限访问"),
    ("404", "请求的资源不存在"),
    ("422", "请求参数验证失败"),
];

/// Converts a raw failure message into the text shown to the user.
///
/// A non-empty message is replaced by the first known fragment it contains,
/// or shown as-is. An empty message falls back to the status code.
pub fn format_message(message: &str, status: Option<u16>) -> String {
    if !message.is_empty() {
        return KNOWN_MESSAGES
            .iter()
            .find(|(fragment, _)| message.contains(fragment))
            .map(|(_, friendly)| friendly.to_string())
            .unwrap_or_else(|| message.to_string());
    }

    if let Some(status) = status {
        let key = status.to_string();
        return KNOWN_MESSAGES
            .iter()
            .find(|(fragment, _)| *fragment == key)
            .map(|(_, friendly)| friendly.to_string())
            .unwrap_or_else(|| format!("请求失败 ({status})"));
    }

    "操作失败，请稍后重试".to_string()
}

/// A dismissible, user-facing description of a failure.
///
/// # Example
///
/// ```
/// use tablescan_lib::error::{Error, ErrorKind, Notice};
///
/// let notice = Notice::from_error(&Error::Timeout { attempts: 30 });
/// assert_eq!(notice.kind, ErrorKind::Timeout);
/// assert_eq!(notice.message, "OCR 识别超时，请稍后重试");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: &'static str,
    pub icon: &'static str,
    /// Whether a retry action should be offered.
    pub retryable: bool,
}

impl Notice {
    /// Builds the notice for an error.
    pub fn from_error(error: &Error) -> Self {
        let kind = ErrorKind::classify(error);
        let raw = match error {
            Error::OcrFailed(detail) if detail.is_empty() => error.to_string(),
            Error::Api(_) | Error::OcrFailed(_) => error.detail(),
            other => other.to_string(),
        };
        let notice = Self {
            kind,
            message: format_message(&raw, error.status_code()),
            suggestion: kind.suggestion(),
            icon: kind.icon(),
            retryable: kind.is_retryable(),
        };
        log::error!("[{}] {} ({})", notice.kind, notice.message, error);
        notice
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}\n{}", self.icon, self.message, self.suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_fragment_order() {
        assert_eq!(ErrorKind::from_message("Failed to fetch", None), ErrorKind::Network);
        assert_eq!(ErrorKind::from_message("上传失败: Bad Request", None), ErrorKind::Upload);
        assert_eq!(ErrorKind::from_message("OCR timeout", None), ErrorKind::Ocr);
        assert_eq!(ErrorKind::from_message("request timeout", None), ErrorKind::Timeout);
        assert_eq!(ErrorKind::from_message("验证失败", None), ErrorKind::Validation);
    }

    #[test]
    fn test_classify_by_status() {
        assert_eq!(ErrorKind::from_message("boom", Some(502)), ErrorKind::Server);
        assert_eq!(ErrorKind::from_message("boom", Some(404)), ErrorKind::Unknown);
        assert_eq!(ErrorKind::from_message("boom", None), ErrorKind::Unknown);
    }

    #[test]
    fn test_classify_typed_errors() {
        assert_eq!(ErrorKind::classify(&Error::Timeout { attempts: 3 }), ErrorKind::Timeout);
        assert_eq!(ErrorKind::classify(&Error::OcrFailed("x".into())), ErrorKind::Ocr);
        assert_eq!(
            ErrorKind::classify(&Error::InvalidImage("bad".into())),
            ErrorKind::Upload
        );
        assert_eq!(
            ErrorKind::classify(&Error::Api(ApiError::http(503, "Service Unavailable"))),
            ErrorKind::Server
        );
        assert_eq!(ErrorKind::classify(&Error::Cancelled), ErrorKind::Unknown);
    }

    #[test]
    fn test_format_message() {
        assert_eq!(format_message("Upload failed: 413", None), "上传失败，请重试");
        assert_eq!(format_message("任务不存在: abc", Some(404)), "任务不存在: abc");
        assert_eq!(format_message("", Some(403)), "没有权限访问");
        assert_eq!(format_message("", Some(418)), "请求失败 (418)");
        assert_eq!(format_message("", None), "操作失败，请稍后重试");
    }

    #[test]
    fn test_notice_uses_server_detail() {
        let error = Error::Api(ApiError::http(400, "不支持的文件格式: .tiff"));
        let notice = Notice::from_error(&error);

        assert_eq!(notice.message, "不支持的文件格式: .tiff");
        assert_eq!(notice.kind, ErrorKind::Unknown);
        assert!(notice.retryable);
    }

    #[test]
    fn test_notice_for_ocr_failure() {
        let notice = Notice::from_error(&Error::OcrFailed("表格区域识别失败".into()));

        assert_eq!(notice.kind, ErrorKind::Ocr);
        assert_eq!(notice.message, "表格区域识别失败");
        assert_eq!(notice.icon, "🔍");
        assert_eq!(notice.to_string(), "🔍 表格区域识别失败\n建议：使用清晰度更高的图片，或稍后重试");
    }

    #[test]
    fn test_notice_not_retryable_for_bad_image() {
        let notice = Notice::from_error(&Error::InvalidImage("Invalid file type: .txt".into()));

        assert_eq!(notice.message, "不支持的文件格式，请上传图片文件");
        assert!(!notice.retryable);
    }
}
