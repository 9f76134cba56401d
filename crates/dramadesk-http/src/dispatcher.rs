//! Interpreter for [`EndpointSpec`] tables.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, trace};

use dramadesk_core::Result;
use dramadesk_core::error::{Error, InvalidInputError};
use dramadesk_core::traits::TagCache;
use dramadesk_core::types::ResourceId;

use crate::client::ApiClient;
use crate::endpoints::EndpointSpec;

/// Runs declared endpoints against a client, reading and filling a shared
/// tag cache.
#[derive(Clone)]
pub struct Dispatcher {
    client: ApiClient,
    cache: Arc<dyn TagCache>,
}

impl Dispatcher {
    pub fn new(client: ApiClient, cache: Arc<dyn TagCache>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<dyn TagCache> {
        &self.cache
    }

    /// Concrete path of `spec` for `id`.
    pub fn resolve_path(spec: &EndpointSpec, id: Option<&ResourceId>) -> Result<String> {
        match (spec.is_templated(), id) {
            (true, Some(id)) => Ok(spec.path.replace("{id}", id.as_str())),
            (false, _) => Ok(spec.path.to_string()),
            (true, None) => Err(InvalidInputError::Other {
                message: format!("endpoint {} requires an id", spec.name),
            }
            .into()),
        }
    }

    /// Call an endpoint and return its raw JSON body.
    ///
    /// Queries are answered from the cache when possible. Mutations
    /// invalidate their tags after a successful response and before
    /// returning, so reads issued afterwards go to the service.
    #[instrument(skip(self, body), fields(endpoint = spec.name))]
    pub async fn call(
        &self,
        spec: &EndpointSpec,
        id: Option<&ResourceId>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let path = Self::resolve_path(spec, id)?;
        let key = format!("{} {}", spec.method.as_str(), path);

        if spec.is_query() {
            if let Some(hit) = self.cache.lookup(&key) {
                trace!(%key, "Served from cache");
                return Ok(hit);
            }
        }

        let epoch = self.cache.epoch();
        let url = self.client.url(&path);
        debug!(method = spec.method.as_str(), %url, "Calling endpoint");

        let mut request = self.client.request(spec.method.to_reqwest(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.client.send(request).await?;

        if spec.is_query() {
            self.cache.store(&key, response.clone(), spec.provides, epoch);
        } else {
            self.invalidate(spec);
        }
        Ok(response)
    }

    /// Invalidate the tags a mutation declares.
    pub fn invalidate(&self, spec: &EndpointSpec) {
        for tag in spec.invalidates {
            self.cache.invalidate(tag);
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Map a 404 from the service to [`Error::NotFound`] for `id`.
pub(crate) fn not_found_as(resource: &'static str, id: &ResourceId) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::Backend(ref b) if b.is_not_found() => Error::not_found(resource, id.as_str()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{GET_DRAMA_VIDEO, LIST_DRAMA_VIDEOS};

    #[test]
    fn resolves_templated_paths() {
        let id = ResourceId::new("v1").unwrap();
        assert_eq!(
            Dispatcher::resolve_path(&GET_DRAMA_VIDEO, Some(&id)).unwrap(),
            "/video-management/single/v1"
        );
        assert_eq!(
            Dispatcher::resolve_path(&LIST_DRAMA_VIDEOS, None).unwrap(),
            "/video-management"
        );
        assert!(Dispatcher::resolve_path(&GET_DRAMA_VIDEO, None).is_err());
    }
}
