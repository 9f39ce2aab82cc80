// CSV export responses for the admin tables

use std::borrow::Cow;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// Render a header row plus records as CSV text
pub fn to_csv<I>(headers: &[&str], rows: I) -> Result<String, ApiError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| ApiError::InternalError(format!("CSV write failed: {}", e)))?;
    for row in rows {
        writer
            .write_record(row.iter().map(|cell| neutralize_formula(cell).into_owned()))
            .map_err(|e| ApiError::InternalError(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::InternalError(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| ApiError::InternalError(e.to_string()))
}

/// Cells a spreadsheet would evaluate as a formula get a leading `'`
pub fn neutralize_formula(cell: &str) -> Cow<'_, str> {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{}", cell)),
        _ => Cow::Borrowed(cell),
    }
}

/// `{prefix}_{YYYY-MM-DD}.csv`
pub fn export_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y-%m-%d"))
}

/// Attachment response carrying CSV text
pub fn csv_attachment(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Value or the given placeholder when absent or blank
pub fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}
