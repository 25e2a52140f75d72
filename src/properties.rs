use std::collections::BTreeMap;

use tracing::error;

/// Properties requested from the server by default. Covers standard resource
/// metadata plus the Nextcloud/ownCloud extension namespaces.
pub const DEFAULT_DAV_PROPERTIES: [&str; 19] = [
    "d:getcontentlength",
    "d:getcontenttype",
    "d:getetag",
    "d:getlastmodified",
    "d:quota-available-bytes",
    "d:resourcetype",
    "nc:has-preview",
    "nc:is-encrypted",
    "nc:mount-type",
    "nc:share-attributes",
    "oc:comments-unread",
    "oc:favorite",
    "oc:fileid",
    "oc:owner-display-name",
    "oc:owner-id",
    "oc:permissions",
    "oc:share-types",
    "oc:size",
    "ocs:share-permissions",
];

pub const DEFAULT_DAV_NAMESPACES: [(&str, &str); 4] = [
    ("d", "DAV:"),
    ("nc", "http://nextcloud.org/ns"),
    ("oc", "http://owncloud.org/ns"),
    ("ocs", "http://open-collaboration-services.org/ns"),
];

/// Registry of the DAV properties enumerated in PROPFIND/REPORT request
/// bodies, with the XML namespaces their prefixes resolve to.
///
/// The registry is owned by the composition root and meant to be extended
/// during application setup, before request traffic begins. Request bodies
/// built from it always reflect the latest registrations.
#[derive(Debug, Clone)]
pub struct DavProperties {
    properties: Vec<String>,
    namespaces: BTreeMap<String, String>,
}

impl Default for DavProperties {
    fn default() -> Self {
        Self {
            properties: DEFAULT_DAV_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            namespaces: DEFAULT_DAV_NAMESPACES
                .iter()
                .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
                .collect(),
        }
    }
}

impl DavProperties {
    /// Registers a custom property so it is requested alongside the defaults.
    ///
    /// `qualified` must be a `prefix:name` pair like `oc:fileid`; the prefix
    /// must already be known or resolvable through `namespaces`. Returns
    /// `false` and leaves the registry untouched when the property is a
    /// duplicate, the name is malformed, or the prefix is unknown. Failures
    /// are logged, never raised, so callers decide whether they are fatal.
    pub fn register(&mut self, qualified: &str, namespaces: &[(&str, &str)]) -> bool {
        if self.properties.iter().any(|p| p.as_str() == qualified) {
            error!(property = qualified, "DAV property already registered");
            return false;
        }

        let parts: Vec<&str> = qualified.split(':').collect();
        if qualified.starts_with('<') || parts.len() != 2 {
            error!(
                property = qualified,
                "DAV property is not valid, expected a 'prefix:name' pair like 'oc:fileid'"
            );
            return false;
        }

        let prefix = parts[0];
        if !self.namespaces.contains_key(prefix)
            && !namespaces.iter().any(|(p, _)| *p == prefix)
        {
            error!(property = qualified, prefix, "DAV property namespace unknown");
            return false;
        }

        self.properties.push(qualified.to_string());
        self.namespaces.extend(
            namespaces
                .iter()
                .map(|(p, uri)| (p.to_string(), uri.to_string())),
        );
        true
    }

    /// Registered qualified property names, in registration order.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Registered namespace prefixes and their URIs.
    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }

    fn xmlns_attributes(&self) -> String {
        self.namespaces
            .iter()
            .map(|(prefix, uri)| format!(r#"xmlns:{}="{}""#, prefix, uri))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn property_elements(&self) -> String {
        self.properties
            .iter()
            .map(|prop| format!("<{} />", prop))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders the default PROPFIND request body enumerating every
    /// registered property. All registered namespaces are declared on the
    /// root element whether or not every property uses them.
    pub fn propfind_body(&self) -> String {
        format!(
            r#"<?xml version="1.0"?>
<d:propfind {}>
    <d:prop>
        {}
    </d:prop>
</d:propfind>"#,
            self.xmlns_attributes(),
            self.property_elements()
        )
    }

    /// Renders the REPORT request body that filters for favorite resources.
    pub fn favorites_report_body(&self) -> String {
        format!(
            r#"<?xml version="1.0"?>
<oc:filter-files {}>
    <d:prop>
        {}
    </d:prop>
    <oc:filter-rules>
        <oc:favorite>1</oc:favorite>
    </oc:filter-rules>
</oc:filter-files>"#,
            self.xmlns_attributes(),
            self.property_elements()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_seeded() {
        let registry = DavProperties::default();
        assert_eq!(registry.properties().len(), 19);
        assert_eq!(registry.namespaces().len(), 4);
        assert_eq!(registry.namespaces().get("d").map(String::as_str), Some("DAV:"));
    }

    #[test]
    fn test_register_custom_property_with_new_namespace() {
        let mut registry = DavProperties::default();
        assert!(registry.register("x:custom", &[("x", "urn:custom")]));
        assert_eq!(registry.properties().len(), 20);
        assert_eq!(
            registry.namespaces().get("x").map(String::as_str),
            Some("urn:custom")
        );
    }

    #[test]
    fn test_register_with_known_prefix_needs_no_namespace() {
        let mut registry = DavProperties::default();
        assert!(registry.register("nc:rich-workspace", &[]));
        assert_eq!(registry.properties().len(), 20);
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = DavProperties::default();
        assert!(!registry.register("oc:fileid", &[]));
        assert_eq!(registry.properties().len(), 19);
        assert_eq!(registry.namespaces().len(), 4);
    }

    #[test]
    fn test_register_rejects_duplicate_after_success() {
        let mut registry = DavProperties::default();
        assert!(registry.register("x:custom", &[("x", "urn:custom")]));
        assert!(!registry.register("x:custom", &[("x", "urn:custom")]));
        assert_eq!(registry.properties().len(), 20);
    }

    #[test]
    fn test_register_rejects_malformed_names() {
        let mut registry = DavProperties::default();
        assert!(!registry.register("nocolon", &[]));
        assert!(!registry.register("too:many:colons", &[("too", "urn:too")]));
        assert!(!registry.register("<d:raw-xml />", &[]));
        assert_eq!(registry.properties().len(), 19);
        assert_eq!(registry.namespaces().len(), 4);
    }

    #[test]
    fn test_register_rejects_unknown_prefix() {
        let mut registry = DavProperties::default();
        assert!(!registry.register("unknown:prop", &[]));
        assert_eq!(registry.properties().len(), 19);
        // the rejected call must not merge its namespaces either
        assert!(!registry.namespaces().contains_key("unknown"));
    }

    #[test]
    fn test_propfind_body_lists_every_property_and_namespace() {
        let mut registry = DavProperties::default();
        registry.register("x:custom", &[("x", "urn:custom")]);

        let body = registry.propfind_body();
        for prop in registry.properties() {
            assert!(body.contains(&format!("<{} />", prop)), "missing {}", prop);
        }
        for (prefix, uri) in registry.namespaces() {
            assert!(body.contains(&format!(r#"xmlns:{}="{}""#, prefix, uri)));
        }
    }

    #[test]
    fn test_favorites_report_body_has_filter_rule() {
        let registry = DavProperties::default();
        let body = registry.favorites_report_body();
        assert!(body.contains("<oc:filter-files"));
        assert!(body.contains("<oc:favorite>1</oc:favorite>"));
        assert!(body.contains("<oc:fileid />"));
        assert!(body.contains(r#"xmlns:oc="http://owncloud.org/ns""#));
    }

    #[test]
    fn test_bodies_reflect_registrations_made_after_first_render() {
        let mut registry = DavProperties::default();
        let before = registry.propfind_body();
        assert!(!before.contains("<x:late />"));

        registry.register("x:late", &[("x", "urn:custom")]);
        let after = registry.propfind_body();
        assert!(after.contains("<x:late />"));
    }
}
