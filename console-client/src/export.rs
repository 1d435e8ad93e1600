//! Spreadsheet export download

use crate::error::ClientResult;
use crate::http::{HttpClient, RequestDescriptor};
use crate::query::Query;
use http::Method;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use regex::Regex;
use shared::error::ApiError;
use std::sync::LazyLock;

/// File name used when the response does not suggest one
pub const DEFAULT_EXPORT_FILE_NAME: &str = "orders-export.xlsx";

const ORDERS_EXPORT_PATH: &str = "/orders/export";

static FILENAME_EXTENDED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\*\s*=\s*(?:[\w-]+)?'[^']*'([^;]+)"#).ok());

static FILENAME_PLAIN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?i)filename\s*=\s*(?:"([^"]*)"|([^;]+))"#).ok());

/// A downloaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Suggested file name from a `content-disposition` header
///
/// Prefers the RFC 5987 `filename*=` form, then `filename=`. Directory
/// components are stripped. `None` if absent or unusable.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let extended = FILENAME_EXTENDED
        .as_ref()
        .and_then(|re| re.captures(header))
        .and_then(|c| c.get(1))
        .and_then(|m| urlencoding::decode(m.as_str().trim()).ok())
        .map(|s| s.into_owned());

    let raw = extended.or_else(|| {
        FILENAME_PLAIN
            .as_ref()
            .and_then(|re| re.captures(header))
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
    })?;

    let name = raw
        .trim()
        .trim_matches('"')
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    (!name.is_empty() && name != "." && name != "..").then_some(name)
}

impl HttpClient {
    /// Download the orders spreadsheet
    pub async fn export_orders(&self, query: Query) -> ClientResult<ExportedFile> {
        let request = RequestDescriptor::new(Method::GET, ORDERS_EXPORT_PATH).options(query.into());
        let response = self.send(request).await?;

        let file_name = header_str(&response, CONTENT_DISPOSITION)
            .as_deref()
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| DEFAULT_EXPORT_FILE_NAME.to_string());
        let content_type = header_str(&response, CONTENT_TYPE);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read export body: {e}")))?
            .to_vec();

        tracing::info!(file_name = %file_name, size = bytes.len(), "Exported orders");
        Ok(ExportedFile {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn header_str(response: &reqwest::Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
