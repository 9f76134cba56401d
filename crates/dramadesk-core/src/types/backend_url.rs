//! Base URLs of the table backend and the video management API.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use crate::error::{Error, InvalidInputError};

/// Where a backend lives.
///
/// `https://` (or `http://` on localhost) points at a PostgREST project or
/// at the video management API; `file://` points at a local table directory.
/// Query strings and fragments are rejected since paths are appended to the
/// base verbatim.
///
/// ```
/// use dramadesk_core::BackendUrl;
///
/// let db = BackendUrl::new("https://abc.supabase.co").unwrap();
/// assert_eq!(db.table_url("movies"), "https://abc.supabase.co/rest/v1/movies");
///
/// let api = BackendUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(api.join("/video-management"), "https://api.example.com/v1/video-management");
///
/// assert!(BackendUrl::new("file:///tmp/dramadesk").unwrap().is_local());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BackendUrl(Url);

impl BackendUrl {
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::BackendUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// `file://` URL of an absolute directory.
    pub fn from_file_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let url = Url::from_file_path(path).map_err(|()| InvalidInputError::BackendUrl {
            value: path.display().to_string(),
            reason: "must be an absolute path".to_string(),
        })?;
        Ok(Self(url))
    }

    /// Append `path` with exactly one `/` between base and path.
    pub fn join(&self, path: &str) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    /// PostgREST endpoint of `table`.
    pub fn table_url(&self, table: &str) -> String {
        self.join(&format!("rest/v1/{}", table))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_local(&self) -> bool {
        self.0.scheme() == "file"
    }

    pub fn is_network(&self) -> bool {
        matches!(self.0.scheme(), "http" | "https")
    }

    /// Table directory of a `file://` URL.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if self.is_local() {
            self.0.to_file_path().ok()
        } else {
            None
        }
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            InvalidInputError::BackendUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        let scheme = url.scheme();

        if scheme == "file" {
            if url.path().is_empty() {
                return Err(invalid("file:// URL must have a path"));
            }
            return Ok(());
        }

        let is_localhost = url
            .host_str()
            .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

        if scheme != "https" && !(scheme == "http" && is_localhost) {
            return Err(invalid("must use HTTPS (HTTP allowed only for localhost)"));
        }

        if url.host_str().is_none() {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query string or fragment"));
        }

        Ok(())
    }
}

impl fmt::Display for BackendUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BackendUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let url = BackendUrl::new("https://abc.supabase.co").unwrap();
        assert!(url.is_network());
        assert!(!url.is_local());
    }

    #[test]
    fn valid_localhost_http() {
        assert!(BackendUrl::new("http://localhost:54321").is_ok());
        assert!(BackendUrl::new("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn table_url_construction() {
        let url = BackendUrl::new("https://abc.supabase.co/").unwrap();
        assert_eq!(
            url.table_url("subscription_packages"),
            "https://abc.supabase.co/rest/v1/subscription_packages"
        );
    }

    #[test]
    fn join_keeps_base_path() {
        let url = BackendUrl::new("http://127.0.0.1:8080/api").unwrap();
        assert_eq!(
            url.join("/video-management/single/v1"),
            "http://127.0.0.1:8080/api/video-management/single/v1"
        );
    }

    #[test]
    fn invalid_http_non_localhost() {
        assert!(BackendUrl::new("http://api.example.com").is_err());
    }

    #[test]
    fn invalid_relative_url() {
        assert!(BackendUrl::new("/rest/v1/movies").is_err());
    }

    #[test]
    fn invalid_query_string() {
        assert!(BackendUrl::new("https://api.example.com/?token=x").is_err());
    }

    #[test]
    fn file_url_to_path() {
        #[cfg(unix)]
        {
            let url = BackendUrl::new("file:///tmp/dramadesk").unwrap();
            assert!(url.is_local());
            assert!(!url.is_network());
            assert_eq!(
                url.to_file_path().unwrap(),
                std::path::PathBuf::from("/tmp/dramadesk")
            );
        }
    }

    #[test]
    fn network_url_has_no_file_path() {
        let url = BackendUrl::new("https://abc.supabase.co").unwrap();
        assert!(url.to_file_path().is_none());
    }
}
