//! Spreadsheet download payload

use crate::model::TaskId;

/// Detail the service returns when downloading before generating.
pub const NOT_GENERATED_DETAIL: &str = "Excel 文件尚未生成";

/// A downloaded spreadsheet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    /// Suggested file name.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Spreadsheet {
    /// The file name used when the service does not suggest one.
    pub fn default_file_name(task_id: &TaskId) -> String {
        format!("table_{task_id}.xlsx")
    }
}

/// Returns `true` if a failed download means the spreadsheet does not exist yet.
pub fn is_not_generated(status: u16, message: &str) -> bool {
    status == 400 && (message.contains(NOT_GENERATED_DETAIL) || message.contains("Bad Request"))
}

/// Extracts the file name from a `Content-Disposition` header value.
///
/// `filename*` (RFC 5987, percent-encoded) takes precedence over `filename`.
/// Only the final path component is kept; names that reduce to nothing, `.`
/// or `..` are rejected.
///
/// # Example
///
/// ```
/// use tablescan_lib::api::parse_content_disposition;
///
/// let name = parse_content_disposition(r#"attachment; filename="scan_20240501_083000.xlsx""#);
/// assert_eq!(name.as_deref(), Some("scan_20240501_083000.xlsx"));
/// ```
pub fn parse_content_disposition(header: &str) -> Option<String> {
    let mut plain = None;

    for param in header.split(';').map(str::trim) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.eq_ignore_ascii_case("filename*") {
            // charset'language'percent-encoded
            let encoded = value.rsplit('\'').next().unwrap_or(value);
            if let Some(name) = urlencoding::decode(encoded)
                .ok()
                .and_then(|decoded| sanitize_file_name(&decoded))
            {
                return Some(name);
            }
        } else if key.eq_ignore_ascii_case("filename") {
            let unquoted = value.trim_matches(|c| c == '"' || c == '\'');
            if let Some(name) = sanitize_file_name(unquoted) {
                plain = Some(name);
            }
        }
    }

    plain
}

/// Reduces a suggested file name to a bare name safe to create in the
/// working directory.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return None;
    }
    Some(base.to_string())
}
