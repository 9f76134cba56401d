//! Video management endpoint table and wire types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use dramadesk_core::error::BackendError;
use dramadesk_core::traits::CacheTag;

/// Tag grouping every cached drama video read.
pub const DRAMA_VIDEO_TAG: CacheTag = CacheTag::new("DramaVideo");

// ============================================================================
// Endpoint Table
// ============================================================================

/// HTTP verb of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One declared endpoint.
///
/// Queries (`GET`) cache their response under `provides`; every other method
/// is a mutation and invalidates `invalidates` once it has succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path under the base URL; `{id}` is replaced by the record identifier.
    pub path: &'static str,
    pub invalidates: &'static [CacheTag],
    pub provides: &'static [CacheTag],
}

impl EndpointSpec {
    pub fn is_query(&self) -> bool {
        self.method == HttpMethod::Get
    }

    /// Whether the path needs an identifier.
    pub fn is_templated(&self) -> bool {
        self.path.contains("{id}")
    }
}

pub const LIST_DRAMA_VIDEOS: EndpointSpec = EndpointSpec {
    name: "getAllDramaVideo",
    method: HttpMethod::Get,
    path: "/video-management",
    invalidates: &[],
    provides: &[DRAMA_VIDEO_TAG],
};

pub const GET_DRAMA_VIDEO: EndpointSpec = EndpointSpec {
    name: "getDramaVideoById",
    method: HttpMethod::Get,
    path: "/video-management/single/{id}",
    invalidates: &[],
    provides: &[DRAMA_VIDEO_TAG],
};

pub const CREATE_DRAMA_VIDEO: EndpointSpec = EndpointSpec {
    name: "createDramaVideo",
    method: HttpMethod::Post,
    path: "/video-management/create",
    invalidates: &[DRAMA_VIDEO_TAG],
    provides: &[],
};

pub const GENERATE_UPLOAD_URL: EndpointSpec = EndpointSpec {
    name: "generateUploadUrl",
    method: HttpMethod::Post,
    path: "/video-management/generate-upload-url",
    invalidates: &[DRAMA_VIDEO_TAG],
    provides: &[],
};

pub const UPDATE_DRAMA_VIDEO: EndpointSpec = EndpointSpec {
    name: "updateDramaVideo",
    method: HttpMethod::Put,
    path: "/video-management/update/{id}",
    invalidates: &[DRAMA_VIDEO_TAG],
    provides: &[],
};

pub const DELETE_DRAMA_VIDEO: EndpointSpec = EndpointSpec {
    name: "deleteDramaVideo",
    method: HttpMethod::Delete,
    path: "/video-management/delete/{id}",
    invalidates: &[DRAMA_VIDEO_TAG],
    provides: &[],
};

pub const TOGGLE_DRAMA_VIDEO_STATUS: EndpointSpec = EndpointSpec {
    name: "toggleDramaVideoStatus",
    method: HttpMethod::Patch,
    path: "/video-management/single/{id}",
    invalidates: &[DRAMA_VIDEO_TAG],
    provides: &[],
};

/// Multipart upload; sent directly through the client, not the dispatcher.
pub const UPLOAD_THUMBNAIL_PATH: &str = "/video-management/{id}/thumbnail";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Every declared drama video endpoint.
pub const DRAMA_VIDEO_ENDPOINTS: &[EndpointSpec] = &[
    LIST_DRAMA_VIDEOS,
    GET_DRAMA_VIDEO,
    CREATE_DRAMA_VIDEO,
    GENERATE_UPLOAD_URL,
    UPDATE_DRAMA_VIDEO,
    DELETE_DRAMA_VIDEO,
    TOGGLE_DRAMA_VIDEO_STATUS,
];

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for generate-upload-url.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
}

/// Upload destination handed out by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub upload_url: String,
    /// Public URL of the object once uploaded, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Whether a body is a record itself rather than an envelope or an ack.
pub(crate) fn is_record(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|map| map.contains_key("id") || map.contains_key("_id"))
}

/// A response body, either bare or wrapped as `{"data": ...}` alongside
/// envelope keys such as `success`, `message` or `meta`.
pub(crate) fn unwrap_data(body: Value) -> Value {
    if is_record(&body) {
        return body;
    }
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Rename `_id` to `id` on records that lack an `id`.
pub(crate) fn normalize_id(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_id),
        Value::Object(map) if !map.contains_key("id") => {
            if let Some(id) = map.remove("_id") {
                map.insert("id".to_string(), id);
            }
        }
        _ => {}
    }
}

/// Decode a response body into `T`, after unwrapping and id normalisation.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> dramadesk_core::Result<T> {
    let mut body = unwrap_data(body);
    normalize_id(&mut body);
    Ok(serde_json::from_value(body)?)
}

/// Error body returned by PostgREST (`code`, `message`, `details`, `hint`) or
/// by the REST service (`error`, `message`).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    details: Option<Value>,
    #[serde(default)]
    hint: Option<Value>,
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(|v| text(Some(v))).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

impl ErrorBody {
    /// Build the backend error for a non-success response.
    pub(crate) fn into_backend_error(status: u16, bytes: &[u8]) -> BackendError {
        match serde_json::from_slice::<ErrorBody>(bytes) {
            Ok(body) => BackendError::new(
                Some(status),
                text(body.code).or_else(|| text(body.error)),
                text(body.message),
            )
            .with_details(text(body.details))
            .with_hint(text(body.hint)),
            Err(_) => {
                let raw = String::from_utf8_lossy(bytes).trim().to_string();
                BackendError::new(Some(status), None, (!raw.is_empty()).then_some(raw))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutations_invalidate_the_video_tag() {
        for spec in DRAMA_VIDEO_ENDPOINTS {
            if spec.is_query() {
                assert!(spec.invalidates.is_empty(), "{}", spec.name);
                assert_eq!(spec.provides, &[DRAMA_VIDEO_TAG], "{}", spec.name);
            } else {
                assert_eq!(spec.invalidates, &[DRAMA_VIDEO_TAG], "{}", spec.name);
            }
        }
    }

    #[test]
    fn unwraps_data_envelope() {
        assert_eq!(unwrap_data(json!({"data": [1]})), json!([1]));
        assert_eq!(
            unwrap_data(json!({"success": true, "data": {"id": "v1"}})),
            json!({"id": "v1"})
        );
        assert_eq!(unwrap_data(json!({"id": "v1"})), json!({"id": "v1"}));
        assert_eq!(
            unwrap_data(json!({"_id": "v1", "data": "raw"})),
            json!({"_id": "v1", "data": "raw"})
        );
    }

    #[test]
    fn unwraps_paginated_envelope() {
        let body = json!({
            "success": true,
            "message": "Videos fetched",
            "meta": {"page": 1, "limit": 20, "total": 1},
            "data": [{"_id": "v1"}]
        });
        assert_eq!(unwrap_data(body), json!([{"_id": "v1"}]));
    }

    #[test]
    fn acknowledgements_are_not_records() {
        assert!(!is_record(&json!({"success": true, "message": "Status updated"})));
        assert!(is_record(&json!({"_id": "v1", "title": "X"})));
        assert!(!is_record(&json!([{"id": "v1"}])));
    }

    #[test]
    fn normalizes_mongo_ids() {
        let mut body = json!([{"_id": "a"}, {"id": "b", "_id": "x"}]);
        normalize_id(&mut body);
        assert_eq!(body, json!([{"id": "a"}, {"id": "b", "_id": "x"}]));
    }

    #[test]
    fn postgrest_error_body() {
        let body = br#"{"code":"23505","message":"duplicate key","details":"Key (id)=(m1) already exists.","hint":null}"#;
        let err = ErrorBody::into_backend_error(409, body);
        assert_eq!(err.status, Some(409));
        assert_eq!(err.code.as_deref(), Some("23505"));
        assert_eq!(err.details.as_deref(), Some("Key (id)=(m1) already exists."));
        assert!(err.hint.is_none());
    }

    #[test]
    fn rest_error_body_with_message_list() {
        let body = br#"{"statusCode":400,"error":"Bad Request","message":["title should not be empty","status must be valid"]}"#;
        let err = ErrorBody::into_backend_error(400, body);
        assert_eq!(err.code.as_deref(), Some("Bad Request"));
        assert_eq!(
            err.message.as_deref(),
            Some("title should not be empty; status must be valid")
        );
    }

    #[test]
    fn plain_text_error_body() {
        let err = ErrorBody::into_backend_error(502, b"bad gateway\n");
        assert_eq!(err.message.as_deref(), Some("bad gateway"));
        assert!(ErrorBody::into_backend_error(500, b"").message.is_none());
    }
}
