//! Drama video accessor over the video management service.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, instrument};

use dramadesk_core::error::{Error, InvalidInputError};
use dramadesk_core::table::{ListOrder, Row};
use dramadesk_core::traits::{Fetched, Resource, ResourceAccessor, TagCache};
use dramadesk_core::types::{ActivityStatus, ResourceId};
use dramadesk_core::{DramaVideo, DramaVideoDraft, DramaVideoPatch, MemoryTagCache, Result, StatusChange};

use crate::client::ApiClient;
use crate::dispatcher::{Dispatcher, not_found_as};
use crate::endpoints::{
    CREATE_DRAMA_VIDEO, DELETE_DRAMA_VIDEO, DRAMA_VIDEO_TAG, GENERATE_UPLOAD_URL, GET_DRAMA_VIDEO,
    LIST_DRAMA_VIDEOS, THUMBNAIL_FIELD, TOGGLE_DRAMA_VIDEO_STATUS, UPDATE_DRAMA_VIDEO,
    UPLOAD_THUMBNAIL_PATH, UploadTarget, UploadUrlRequest, decode, is_record, normalize_id,
    unwrap_data,
};

/// A thumbnail image to upload.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Thumbnail {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an image file, guessing its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("thumbnail")
            .to_string();
        let mime_type = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("webp") => "image/webp",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        };
        Ok(Self::new(file_name, mime_type, bytes))
    }
}

/// [`ResourceAccessor`] for drama videos, plus the video-specific operations.
#[derive(Debug, Clone)]
pub struct DramaVideoApi {
    dispatcher: Dispatcher,
    order: ListOrder,
}

impl DramaVideoApi {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            order: ListOrder::descending("createdAt"),
        }
    }

    /// Accessor with its own in-memory tag cache.
    pub fn with_memory_cache(client: ApiClient) -> Self {
        let cache: Arc<dyn TagCache> = Arc::new(MemoryTagCache::new());
        Self::new(Dispatcher::new(client, cache))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Decode a mutation response into a record, reading it back when the
    /// service answers with an acknowledgement or nothing at all.
    async fn record_or_read_back(&self, body: Value, id: &ResourceId) -> Result<DramaVideo> {
        let body = unwrap_data(body);
        if is_record(&body) {
            return decode(body);
        }
        debug!("Mutation returned no record, reading back");
        self.get_by_id(id).await?.require(DramaVideo::KIND, id)
    }

    /// Change the lifecycle status of a video, leaving every other field as is.
    #[instrument(skip(self), fields(%id))]
    pub async fn toggle_status(
        &self,
        id: &ResourceId,
        status: ActivityStatus,
    ) -> Result<DramaVideo> {
        let body = serde_json::to_value(StatusChange { status })?;
        let response = self
            .dispatcher
            .call(&TOGGLE_DRAMA_VIDEO_STATUS, Some(id), Some(&body))
            .await
            .map_err(not_found_as(DramaVideo::KIND, id))?;
        self.record_or_read_back(response, id).await
    }

    /// Obtain an upload destination for a video file.
    #[instrument(skip(self))]
    pub async fn generate_upload_url(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<UploadTarget> {
        let body = serde_json::to_value(UploadUrlRequest {
            file_name,
            content_type,
        })?;
        let response = self
            .dispatcher
            .call(&GENERATE_UPLOAD_URL, None, Some(&body))
            .await?;
        decode(response)
    }

    /// Upload a thumbnail as a multipart body.
    ///
    /// This bypasses the endpoint table; the video tag is invalidated here
    /// once the upload succeeds. Returns the service response body.
    #[instrument(skip(self, thumbnail), fields(%id, file_name = %thumbnail.file_name))]
    pub async fn upload_thumbnail(&self, id: &ResourceId, thumbnail: Thumbnail) -> Result<Value> {
        let client = self.dispatcher.client();
        let url = client.url(&UPLOAD_THUMBNAIL_PATH.replace("{id}", id.as_str()));

        let part = Part::bytes(thumbnail.bytes)
            .file_name(thumbnail.file_name)
            .mime_str(&thumbnail.mime_type)
            .map_err(|e| {
                Error::from(InvalidInputError::Other {
                    message: format!("invalid thumbnail type: {}", e),
                })
            })?;
        let form = Form::new().part(THUMBNAIL_FIELD, part);

        debug!(%url, "Uploading thumbnail");
        let response = client
            .send(client.request(Method::POST, &url).multipart(form))
            .await
            .map_err(not_found_as(DramaVideo::KIND, id))?;

        self.dispatcher.cache().invalidate(&DRAMA_VIDEO_TAG);

        let mut body = unwrap_data(response);
        normalize_id(&mut body);
        Ok(body)
    }
}

#[async_trait]
impl ResourceAccessor for DramaVideoApi {
    type Resource = DramaVideo;
    type Draft = DramaVideoDraft;
    type Patch = DramaVideoPatch;

    fn default_order(&self) -> ListOrder {
        self.order.clone()
    }

    #[instrument(skip(self))]
    async fn list(&self, order: Option<&ListOrder>) -> Result<Vec<DramaVideo>> {
        let response = self.dispatcher.call(&LIST_DRAMA_VIDEOS, None, None).await?;
        let mut body = unwrap_data(response);
        normalize_id(&mut body);

        let mut rows: Vec<Row> = match body {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(row) => Ok(row),
                    _ => Err(Error::from(InvalidInputError::Row {
                        reason: "video list holds a non-object entry".to_string(),
                    })),
                })
                .collect::<Result<_>>()?,
            Value::Null => Vec::new(),
            _ => {
                return Err(InvalidInputError::Row {
                    reason: "video list response is not an array".to_string(),
                }
                .into());
            }
        };

        order.unwrap_or(&self.order).sort_rows(&mut rows);
        debug!(count = rows.len(), "Listed drama videos");
        rows.into_iter().map(dramadesk_core::table::from_row).collect()
    }

    #[instrument(skip(self), fields(%id))]
    async fn get_by_id(&self, id: &ResourceId) -> Result<Fetched<DramaVideo>> {
        match self.dispatcher.call(&GET_DRAMA_VIDEO, Some(id), None).await {
            Ok(response) => match unwrap_data(response) {
                Value::Null => Ok(Fetched::NotFound),
                body => Ok(Fetched::Found(decode(body)?)),
            },
            Err(Error::Backend(b)) if b.is_not_found() => Ok(Fetched::NotFound),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, draft))]
    async fn create(&self, draft: &DramaVideoDraft) -> Result<DramaVideo> {
        let body = serde_json::to_value(draft)?;
        let response = self
            .dispatcher
            .call(&CREATE_DRAMA_VIDEO, None, Some(&body))
            .await?;
        let video: DramaVideo = decode(response)?;
        debug!(id = %video.id, "Created drama video");
        Ok(video)
    }

    #[instrument(skip(self, patch), fields(%id))]
    async fn update(&self, id: &ResourceId, patch: &DramaVideoPatch) -> Result<DramaVideo> {
        let body = serde_json::to_value(patch)?;
        let response = self
            .dispatcher
            .call(&UPDATE_DRAMA_VIDEO, Some(id), Some(&body))
            .await
            .map_err(not_found_as(DramaVideo::KIND, id))?;
        self.record_or_read_back(response, id).await
    }

    #[instrument(skip(self), fields(%id))]
    async fn delete(&self, id: &ResourceId) -> Result<bool> {
        self.dispatcher
            .call(&DELETE_DRAMA_VIDEO, Some(id), None)
            .await
            .map_err(not_found_as(DramaVideo::KIND, id))?;
        debug!("Deleted drama video");
        Ok(true)
    }
}
