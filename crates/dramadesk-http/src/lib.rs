//! dramadesk-http - PostgREST tables and the video management REST API.

mod client;
mod dispatcher;
pub mod endpoints;
mod postgrest;
mod video;

pub use client::ApiClient;
pub use dispatcher::Dispatcher;
pub use endpoints::{DRAMA_VIDEO_TAG, EndpointSpec, HttpMethod, UploadTarget};
pub use postgrest::PostgrestTable;
pub use video::{DramaVideoApi, Thumbnail};
