//! Multipart upload reader shared by the import endpoints.
//!
//! The form carries a `file` part (the CSV or spreadsheet), an optional
//! `mapping` part holding the caller's `FieldMapping` as JSON text, and an
//! optional `source` label. Unknown parts are drained and ignored.

use crate::error::RequestError;
use actix_multipart::Multipart;
use common::model::mapping::FieldMapping;
use futures_util::StreamExt;

/// A fully buffered import upload.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mapping: Option<FieldMapping>,
    pub source: Option<String>,
}

async fn read_part(
    field: &mut actix_multipart::Field,
    limit: usize,
) -> Result<Vec<u8>, RequestError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| RequestError::Multipart(e.to_string()))?;
        if bytes.len() + chunk.len() > limit {
            return Err(RequestError::PayloadTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn part_text(bytes: Vec<u8>, part: &str) -> Result<String, RequestError> {
    String::from_utf8(bytes)
        .map_err(|_| RequestError::Multipart(format!("'{}' is not valid UTF-8", part)))
}

/// Buffers the multipart form, enforcing `limit` on the file part.
pub async fn read_upload(mut payload: Multipart, limit: usize) -> Result<Upload, RequestError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut mapping: Option<FieldMapping> = None;
    let mut source: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| RequestError::Multipart(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let bytes = read_part(&mut field, limit).await?;
                file = Some((filename, bytes));
            }

            Some("mapping") => {
                let text = part_text(read_part(&mut field, limit).await?, "mapping")?;
                // An empty mapping part means "no mapping", the same as leaving it out.
                if !text.trim().is_empty() {
                    let parsed = serde_json::from_str::<FieldMapping>(&text)
                        .map_err(|e| RequestError::InvalidMapping(e.to_string()))?;
                    mapping = Some(parsed);
                }
            }

            Some("source") => {
                source = Some(part_text(read_part(&mut field, limit).await?, "source")?);
            }

            _ => {
                read_part(&mut field, limit).await?;
            }
        }
    }

    let (filename, bytes) = file.ok_or(RequestError::MissingFile)?;
    Ok(Upload {
        filename,
        bytes,
        mapping,
        source,
    })
}
