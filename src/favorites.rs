use tracing::debug;

use crate::auth::Session;
use crate::client::{DavClient, DavMethod, ListOptions};
use crate::error::Result;
use crate::models::Node;
use crate::node::resource_to_node;
use crate::permissions::DecodePermissions;
use crate::properties::DavProperties;

/// Queries the resources flagged as favorite under `path`, excluding the
/// queried collection itself.
///
/// `path` is relative to `dav_root` (e.g. `/` for all favorites of the user).
/// Results keep the server's order; transport errors propagate unchanged.
pub async fn get_favorite_nodes(
    client: &DavClient,
    properties: &DavProperties,
    session: &dyn Session,
    permissions: &dyn DecodePermissions,
    path: &str,
    dav_root: &str,
) -> Result<Vec<Node>> {
    let options = ListOptions {
        method: DavMethod::Report,
        body: Some(properties.favorites_report_body()),
        // keep the queried collection so exclusion stays under our control
        include_self: true,
        ..ListOptions::default()
    };

    let contents = client
        .get_directory_contents(&format!("{}{}", dav_root, path), &options)
        .await?;
    debug!(count = contents.len(), path, dav_root, "favorites report returned");

    let owner = session.user_id().unwrap_or_default();

    Ok(contents
        .into_iter()
        .map(|mut resource| {
            // descriptor paths become relative to the DAV root
            if let Some(relative) = resource.path.strip_prefix(dav_root) {
                resource.path = if relative.is_empty() {
                    "/".to_string()
                } else {
                    relative.to_string()
                };
            }
            resource
        })
        // exclude the queried collection itself, by exact string equality
        .filter(|resource| resource.path != path)
        .map(|resource| {
            resource_to_node(&resource, dav_root, client.remote_url(), &owner, permissions)
        })
        .collect())
}
