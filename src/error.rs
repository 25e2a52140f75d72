use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T, E = DavError> = std::result::Result<T, E>;

/// Errors surfaced by the DAV client.
///
/// Property registration failures are deliberately not part of this taxonomy:
/// they are reported as a `false` return plus a log entry so callers can
/// decide whether a rejected registration is fatal.
#[derive(Error, Debug)]
pub enum DavError {
    #[error("Invalid DAV configuration: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid HTTP method name: {0}")]
    Method(String),

    #[error("{method} {url} failed with status: {status}")]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
    },

    #[error("Malformed multistatus response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed multistatus response: {0}")]
    Response(String),
}
