use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permissions::Capabilities;

/// Mime type every folder node carries, whatever the server reported.
pub const FOLDER_MIME: &str = "httpd/unix-directory";

/// Whether a server-reported resource is a plain file or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Collection,
}

/// One server-reported item from a multistatus response, prior to mapping
/// into a [`Node`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Resource path, relative to the base URL the request was issued under.
    pub path: String,
    pub resource_type: ResourceType,
    /// Raw last-modified timestamp as reported by the server.
    pub last_modified: Option<String>,
    /// Absent for collections, which have no intrinsic mime type.
    pub mime_type: Option<String>,
    /// Property values keyed by qualified name, e.g. `oc:fileid`. Contains
    /// whatever subset of the requested properties the server returned,
    /// including caller-registered extension properties.
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Folder,
}

/// A file or folder entity mapped from a [`ResourceDescriptor`].
///
/// Immutable once constructed; owns its attribute bag and holds no references
/// back to the client or the property registry.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Server-assigned identity, 0 when the server did not report one.
    pub id: u64,
    /// Absolute URL of the resource on the remote server.
    pub source: String,
    pub mtime: Option<DateTime<Utc>>,
    pub mime: String,
    pub size: u64,
    pub permissions: Capabilities,
    /// User id of the current session's user.
    pub owner: String,
    /// The DAV root this node was resolved under, e.g. `/files/alice`.
    pub root: String,
    /// Raw descriptor and property fields merged flat, plus the normalized
    /// `hasPreview` boolean.
    pub attributes: Map<String, Value>,
}

impl Node {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// File extension derived from the source URL. Always `None` for
    /// folders, regardless of what the raw attributes say.
    pub fn extension(&self) -> Option<&str> {
        if self.kind == NodeKind::Folder {
            return None;
        }
        let basename = self.source.rsplit('/').next().unwrap_or("");
        match basename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}
