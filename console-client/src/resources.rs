//! CRUD helpers for console resources
//!
//! Payloads are backend-owned and pass through as `serde_json::Value`.

use crate::error::ClientResult;
use crate::extract::{extract_collection, extract_total};
use crate::http::{Body, HttpClient, RequestOptions};
use crate::query::Query;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use shared::Resource;
use shared::error::{ApiError, ErrorCode, NO_STATUS};

/// Image types accepted for uploads
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// One page of a resource listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub total: u64,
}

impl HttpClient {
    /// List a resource; unknown response shapes yield an empty list
    pub async fn list(&self, resource: Resource, query: Query) -> ClientResult<Page> {
        let body = self.get(resource.path(), query.into()).await?;
        let items = extract_collection(&body, resource);
        let total = extract_total(&body, items.len());
        tracing::debug!(resource = %resource, count = items.len(), total, "Listed resource");
        Ok(Page { items, total })
    }

    /// Fetch one item
    pub async fn fetch(&self, resource: Resource, id: &str) -> ClientResult<Value> {
        self.get(&resource.item_path(id), RequestOptions::new()).await
    }

    /// Create an item
    pub async fn create<B: Serialize + ?Sized>(&self, resource: Resource, payload: &B) -> ClientResult<Value> {
        let created = self
            .post(resource.path(), Some(Body::json(payload)?), RequestOptions::new())
            .await?;
        tracing::info!(resource = %resource, "Created {}", resource.label());
        Ok(created)
    }

    /// Replace an item
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: &str,
        payload: &B,
    ) -> ClientResult<Value> {
        let updated = self
            .put(&resource.item_path(id), Some(Body::json(payload)?), RequestOptions::new())
            .await?;
        tracing::info!(resource = %resource, id, "Updated {}", resource.label());
        Ok(updated)
    }

    /// Partially update an item
    pub async fn modify<B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: &str,
        changes: &B,
    ) -> ClientResult<Value> {
        self.patch(&resource.item_path(id), Some(Body::json(changes)?), RequestOptions::new())
            .await
    }

    /// Delete an item
    pub async fn remove(&self, resource: Resource, id: &str) -> ClientResult<()> {
        self.delete(&resource.item_path(id), None, RequestOptions::new())
            .await?;
        tracing::info!(resource = %resource, id, "Deleted {}", resource.label());
        Ok(())
    }

    /// Upload an image for an item as multipart field `image`
    pub async fn upload_image(
        &self,
        resource: Resource,
        id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> ClientResult<Value> {
        if !ACCEPTED_IMAGE_TYPES.contains(&mime) {
            return Err(ApiError::from_code(ErrorCode::UnsupportedFileType, NO_STATUS));
        }
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|_| ApiError::from_code(ErrorCode::UnsupportedFileType, NO_STATUS))?;
        let form = Form::new().part("image", part);

        let path = format!("{}/image", resource.item_path(id));
        self.post(&path, Some(Body::Multipart(form)), RequestOptions::new())
            .await
    }
}
