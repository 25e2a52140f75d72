pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod node;
pub mod permissions;
pub mod properties;
pub mod xml;

// Re-export main types for convenience
pub use auth::{Session, StaticSession};
pub use client::{DavClient, DavMethod, Depth, ListOptions};
pub use config::{dav_root_path, remote_dav_url, DavConfig};
pub use error::{DavError, Result};
pub use favorites::get_favorite_nodes;
pub use models::{Node, NodeKind, ResourceDescriptor, ResourceType, FOLDER_MIME};
pub use node::resource_to_node;
pub use permissions::{Capabilities, DecodePermissions, NoPermissions};
pub use properties::{DavProperties, DEFAULT_DAV_NAMESPACES, DEFAULT_DAV_PROPERTIES};

use std::sync::Arc;

/// Composition root tying the client to its collaborators.
///
/// Owns the property registry, so extension properties are registered here
/// during application setup, before request traffic begins.
#[derive(Clone)]
pub struct DavFiles {
    client: DavClient,
    properties: DavProperties,
    session: Arc<dyn Session>,
    permissions: Arc<dyn DecodePermissions>,
}

impl DavFiles {
    pub fn new(
        client: DavClient,
        session: Arc<dyn Session>,
        permissions: Arc<dyn DecodePermissions>,
    ) -> Self {
        Self {
            client,
            properties: DavProperties::default(),
            session,
            permissions,
        }
    }

    pub fn client(&self) -> &DavClient {
        &self.client
    }

    pub fn properties(&self) -> &DavProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut DavProperties {
        &mut self.properties
    }

    /// The DAV root for the current session's user, `/files/{uid}`.
    pub fn dav_root(&self) -> String {
        dav_root_path(&self.session.user_id().unwrap_or_default())
    }

    /// Favorites under `path`, resolved against the session's DAV root.
    pub async fn get_favorites(&self, path: &str) -> Result<Vec<Node>> {
        get_favorite_nodes(
            &self.client,
            &self.properties,
            self.session.as_ref(),
            self.permissions.as_ref(),
            path,
            &self.dav_root(),
        )
        .await
    }
}
