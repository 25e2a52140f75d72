use serde_json::{json, Map, Value};

use crate::models::{Node, NodeKind, ResourceDescriptor, ResourceType, FOLDER_MIME};
use crate::permissions::DecodePermissions;
use crate::xml::parse_http_date;

/// Maps one reported resource into a [`Node`].
///
/// Total over any well-formed descriptor: malformed identity, size or
/// timestamp values degrade to their defaults (0, 0, `None`) instead of
/// failing. `root` is the DAV root the resource was resolved under and is
/// recorded on the node; `remote_url` is the client's base URL used to build
/// the absolute source URL.
pub fn resource_to_node(
    resource: &ResourceDescriptor,
    root: &str,
    remote_url: &str,
    owner: &str,
    permissions: &dyn DecodePermissions,
) -> Node {
    let props = &resource.properties;

    let id = props
        .get("oc:fileid")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    // dedicated size property first, content length as fallback
    let size = props
        .get("oc:size")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| {
            props
                .get("d:getcontentlength")
                .and_then(|v| v.trim().parse::<u64>().ok())
        })
        .unwrap_or(0);

    let raw_permissions = props.get("oc:permissions").map(String::as_str).unwrap_or("");
    let capabilities = permissions.decode(raw_permissions);

    let mtime = resource.last_modified.as_deref().and_then(parse_http_date);

    let kind = match resource.resource_type {
        ResourceType::Collection => NodeKind::Folder,
        ResourceType::File => NodeKind::File,
    };

    // folders get the collection mime unconditionally, whatever the server said
    let mime = match kind {
        NodeKind::Folder => FOLDER_MIME.to_string(),
        NodeKind::File => resource
            .mime_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    };

    let mut attributes = Map::new();
    attributes.insert("path".to_string(), json!(resource.path));
    attributes.insert("type".to_string(), json!(resource.resource_type));
    attributes.insert("lastmod".to_string(), json!(resource.last_modified));
    attributes.insert("mime".to_string(), json!(mime));
    for (name, value) in props {
        attributes.insert(name.clone(), json!(value));
    }
    let has_preview = matches!(
        props.get("nc:has-preview").map(|v| v.trim()),
        Some("true") | Some("1")
    );
    attributes.insert("hasPreview".to_string(), Value::Bool(has_preview));

    Node {
        kind,
        id,
        source: format!("{}{}{}", remote_url, root, resource.path),
        mtime,
        mime,
        size,
        permissions: capabilities,
        owner: owner.to_string(),
        root: root.to_string(),
        attributes,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::permissions::{Capabilities, NoPermissions};

    const ROOT: &str = "/files/alice";
    const REMOTE: &str = "https://cloud.example.com/remote.php/dav";

    fn descriptor(resource_type: ResourceType, props: &[(&str, &str)]) -> ResourceDescriptor {
        ResourceDescriptor {
            path: "/Documents/report.pdf".to_string(),
            resource_type,
            last_modified: Some("Mon, 01 Jan 2024 12:00:00 GMT".to_string()),
            mime_type: Some("application/pdf".to_string()),
            properties: props
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_maps_file_fields() {
        let resource = descriptor(
            ResourceType::File,
            &[
                ("oc:fileid", "42"),
                ("oc:size", "2048"),
                ("oc:permissions", "RGDNVW"),
                ("nc:has-preview", "true"),
            ],
        );
        let decoder = |raw: &str| Capabilities {
            read: raw.contains('G'),
            update: raw.contains('W'),
            ..Capabilities::none()
        };

        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &decoder);

        assert_eq!(node.kind, NodeKind::File);
        assert_eq!(node.id, 42);
        assert_eq!(node.size, 2048);
        assert_eq!(node.mime, "application/pdf");
        assert_eq!(
            node.source,
            "https://cloud.example.com/remote.php/dav/files/alice/Documents/report.pdf"
        );
        assert_eq!(node.owner, "alice");
        assert_eq!(node.root, ROOT);
        assert!(node.mtime.is_some());
        assert!(node.permissions.read);
        assert!(node.permissions.update);
        assert!(!node.permissions.delete);
        assert_eq!(node.extension(), Some("pdf"));
        assert_eq!(node.attributes.get("hasPreview"), Some(&Value::Bool(true)));
        assert_eq!(node.attributes.get("oc:fileid"), Some(&json!("42")));
        assert_eq!(node.attributes.get("path"), Some(&json!("/Documents/report.pdf")));
    }

    #[test]
    fn test_folder_forces_collection_mime_and_no_extension() {
        // raw mime says pdf; the collection invariant must win
        let mut resource = descriptor(ResourceType::Collection, &[]);
        resource.path = "/Documents.old".to_string();

        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &NoPermissions);

        assert_eq!(node.kind, NodeKind::Folder);
        assert_eq!(node.mime, FOLDER_MIME);
        assert_eq!(node.extension(), None);
        assert_eq!(node.attributes.get("mime"), Some(&json!(FOLDER_MIME)));
    }

    #[test]
    fn test_size_falls_back_to_content_length() {
        let resource = descriptor(ResourceType::File, &[("d:getcontentlength", "1234")]);
        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &NoPermissions);
        assert_eq!(node.size, 1234);
    }

    #[test]
    fn test_size_prefers_dedicated_property() {
        let resource = descriptor(
            ResourceType::File,
            &[("oc:size", "99"), ("d:getcontentlength", "1234")],
        );
        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &NoPermissions);
        assert_eq!(node.size, 99);
    }

    #[test]
    fn test_missing_values_degrade_to_defaults() {
        let resource = ResourceDescriptor {
            path: "/bare".to_string(),
            resource_type: ResourceType::File,
            last_modified: None,
            mime_type: None,
            properties: BTreeMap::new(),
        };

        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &NoPermissions);

        assert_eq!(node.id, 0);
        assert_eq!(node.size, 0);
        assert_eq!(node.mtime, None);
        assert_eq!(node.mime, "application/octet-stream");
        assert_eq!(node.permissions, Capabilities::none());
        assert_eq!(node.attributes.get("hasPreview"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_malformed_numbers_degrade_to_defaults() {
        let resource = descriptor(
            ResourceType::File,
            &[("oc:fileid", "not-a-number"), ("oc:size", "-5")],
        );
        let node = resource_to_node(&resource, ROOT, REMOTE, "alice", &NoPermissions);
        assert_eq!(node.id, 0);
        assert_eq!(node.size, 0);
    }
}
