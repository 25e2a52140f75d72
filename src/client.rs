use reqwest::{Client, Method, StatusCode, Url};
use tracing::debug;

use crate::config::DavConfig;
use crate::error::{DavError, Result};
use crate::models::ResourceDescriptor;
use crate::xml::parse_multistatus;

/// Verb used for a directory-contents call.
///
/// PROPFIND is the plain property listing; REPORT runs a server-side filtered
/// query (favorites). The verb is a first-class parameter of the call, so no
/// header-based method smuggling is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DavMethod {
    #[default]
    Propfind,
    Report,
}

impl DavMethod {
    pub fn name(self) -> &'static str {
        match self {
            DavMethod::Propfind => "PROPFIND",
            DavMethod::Report => "REPORT",
        }
    }

    fn as_method(self) -> Result<Method> {
        Method::from_bytes(self.name().as_bytes())
            .map_err(|e| DavError::Method(format!("{}: {}", self.name(), e)))
    }
}

/// Value of the `Depth` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    Zero,
    #[default]
    One,
    Infinity,
}

impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Zero => "0",
            Depth::One => "1",
            Depth::Infinity => "infinity",
        }
    }
}

/// Options for one directory-contents request.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub method: DavMethod,
    /// XML request body; when unset the server applies its allprop default.
    pub body: Option<String>,
    pub depth: Depth,
    /// Keep the queried collection itself in the result set.
    pub include_self: bool,
}

/// WebDAV client bound to one remote endpoint.
///
/// Attaches the session's `requesttoken` header to every request and performs
/// no retry, pooling or caching of its own: each call is an independent round
/// trip, and failures surface unchanged.
#[derive(Debug, Clone)]
pub struct DavClient {
    http: Client,
    remote_url: String,
    base_path: String,
    request_token: String,
}

impl DavClient {
    pub fn new(config: &DavConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder().timeout(config.timeout()).build()?;

        let remote_url = config.remote_url.trim_end_matches('/').to_string();
        // validate() already proved the URL parses
        let base_path = match Url::parse(&remote_url) {
            Ok(url) if url.path() != "/" => url.path().trim_end_matches('/').to_string(),
            _ => String::new(),
        };

        Ok(Self {
            http,
            remote_url,
            base_path,
            request_token: config.request_token.clone().unwrap_or_default(),
        })
    }

    /// The remote base URL this client was constructed with, without a
    /// trailing slash.
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// Lists a collection's contents with full property details.
    ///
    /// `path` is relative to the remote base URL (it includes the DAV root,
    /// e.g. `/files/alice/Documents`). Returned descriptor paths are made
    /// relative to the same base so they are comparable to `path`. Unless
    /// `include_self` is set, the entry for the queried collection itself is
    /// dropped.
    pub async fn get_directory_contents(
        &self,
        path: &str,
        options: &ListOptions,
    ) -> Result<Vec<ResourceDescriptor>> {
        let url = format!("{}{}", self.remote_url, path);
        debug!(method = options.method.name(), %url, "DAV directory contents request");

        let mut request = self
            .http
            .request(options.method.as_method()?, &url)
            .header("requesttoken", &self.request_token)
            .header("Depth", options.depth.as_str())
            .header("Content-Type", "application/xml");

        if let Some(ref body) = options.body {
            request = request.body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::MULTI_STATUS && !status.is_success() {
            return Err(DavError::Status {
                method: options.method.name(),
                url,
                status,
            });
        }

        let text = response.text().await?;
        let mut resources = parse_multistatus(&text)?;

        for resource in &mut resources {
            resource.path = self.relative_path(&resource.path);
        }

        let query_path = normalize_path(path);
        if !options.include_self {
            resources.retain(|resource| resource.path != query_path);
        }

        debug!(count = resources.len(), path, "DAV directory contents parsed");
        Ok(resources)
    }

    /// Strips the endpoint's own path prefix from a reported href path, so
    /// descriptor paths start at the DAV namespace (`/files/...`).
    fn relative_path(&self, href_path: &str) -> String {
        let stripped = if self.base_path.is_empty() {
            href_path
        } else {
            href_path.strip_prefix(&self.base_path).unwrap_or(href_path)
        };
        normalize_path(stripped)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DavClient {
        let config = DavConfig::new("https://cloud.example.com/remote.php/dav")
            .with_request_token("tok");
        DavClient::new(&config).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(DavClient::new(&DavConfig::new("not a url")).is_err());
    }

    #[test]
    fn test_relative_path_strips_endpoint_prefix() {
        let client = client();
        assert_eq!(
            client.relative_path("/remote.php/dav/files/alice/Documents/"),
            "/files/alice/Documents"
        );
        // foreign prefixes pass through untouched
        assert_eq!(client.relative_path("/other/files/a"), "/other/files/a");
    }

    #[test]
    fn test_relative_path_for_endpoint_root() {
        let client = client();
        assert_eq!(client.relative_path("/remote.php/dav/"), "/");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(DavMethod::Propfind.name(), "PROPFIND");
        assert_eq!(DavMethod::Report.name(), "REPORT");
        assert_eq!(Depth::Infinity.as_str(), "infinity");
    }

    #[test]
    fn test_methods_convert_to_http_verbs() {
        assert_eq!(DavMethod::Propfind.as_method().unwrap().as_str(), "PROPFIND");
        assert_eq!(DavMethod::Report.as_method().unwrap().as_str(), "REPORT");
    }
}
