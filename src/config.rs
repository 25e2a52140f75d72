use std::time::Duration;

use crate::error::{DavError, Result};

/// Client configuration for one DAV endpoint.
#[derive(Debug, Clone)]
pub struct DavConfig {
    /// Absolute base URL of the DAV endpoint, e.g.
    /// `https://cloud.example.com/remote.php/dav`.
    pub remote_url: String,
    /// Security token sent as the `requesttoken` header on every request.
    /// An empty header is sent when no token is available.
    pub request_token: Option<String>,
    pub timeout_seconds: u64,
}

impl DavConfig {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            request_token: None,
            timeout_seconds: 30,
        }
    }

    pub fn with_request_token(mut self, token: impl Into<String>) -> Self {
        self.request_token = Some(token.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.remote_url.trim().is_empty() {
            return Err(DavError::Config("remote_url is empty".to_string()));
        }

        if !self.remote_url.starts_with("http://") && !self.remote_url.starts_with("https://") {
            return Err(DavError::Config(format!(
                "remote_url must start with 'http://' or 'https://'. Current value: '{}'. \
                 Example: https://cloud.example.com/remote.php/dav",
                self.remote_url
            )));
        }

        if let Err(e) = url::Url::parse(&self.remote_url) {
            return Err(DavError::Config(format!(
                "remote_url is not a valid absolute URL: {}. Current value: '{}'",
                e, self.remote_url
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// The DAV remote URL for a server, e.g.
/// `https://cloud.example.com/remote.php/dav`.
pub fn remote_dav_url(server_url: &str) -> String {
    format!("{}/remote.php/dav", server_url.trim_end_matches('/'))
}

/// The DAV root path under which a user's files are exposed, e.g.
/// `/files/alice`.
pub fn dav_root_path(user_id: &str) -> String {
    format!("/files/{}", user_id)
}
