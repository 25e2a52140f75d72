use std::collections::BTreeMap;
use std::str;

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::reader::Reader;

use crate::error::{DavError, Result};
use crate::models::{ResourceDescriptor, ResourceType};

#[derive(Debug, Default)]
struct ResponseState {
    href: String,
    has_ok_propstat: bool,
    is_collection: bool,
    last_modified: Option<String>,
    content_type: Option<String>,
    properties: BTreeMap<String, String>,
}

/// Property values buffered for one `propstat` block. Merged into the
/// response only when the block's status turns out to be 200; values under
/// 404 (or any other) propstats are discarded wholesale.
#[derive(Debug, Default)]
struct PropstatState {
    status_ok: bool,
    is_collection: bool,
    last_modified: Option<String>,
    content_type: Option<String>,
    properties: BTreeMap<String, String>,
}

/// Parses a 207 Multistatus body into resource descriptors.
///
/// Every property element under a 200-status `propstat` is captured into the
/// descriptor's property bag under its document-qualified name (prefix as
/// declared by the server, e.g. `oc:fileid`), which is what makes
/// caller-registered extension properties visible downstream. Hrefs are
/// URL-decoded; trailing slashes on collection hrefs are dropped.
pub fn parse_multistatus(xml_text: &str) -> Result<Vec<ResourceDescriptor>> {
    let mut reader = Reader::from_str(xml_text);
    reader.config_mut().trim_text(true);

    let mut resources = Vec::new();
    let mut current: Option<ResponseState> = None;
    let mut propstat: Option<PropstatState> = None;
    let mut current_local = String::new();
    let mut current_qualified = String::new();
    let mut in_prop = false;
    let mut in_resourcetype = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let local = local_name(e.name())?;

                match local.as_str() {
                    "response" => {
                        current = Some(ResponseState::default());
                        propstat = None;
                    }
                    "propstat" => {
                        propstat = Some(PropstatState::default());
                    }
                    "prop" => {
                        in_prop = true;
                    }
                    "resourcetype" => {
                        in_resourcetype = true;
                    }
                    "collection" if in_resourcetype => {
                        if let Some(ref mut pending) = propstat {
                            pending.is_collection = true;
                        }
                    }
                    _ => {
                        current_local = local;
                        current_qualified = qualified_name(e.name())?;
                    }
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape()?.to_string();
                if text.trim().is_empty() {
                    // ignore inter-element whitespace
                } else {
                    match current_local.as_str() {
                        "href" => {
                            if let Some(ref mut resp) = current {
                                resp.href = text.trim().to_string();
                            }
                        }
                        "status" => {
                            if let Some(ref mut pending) = propstat {
                                if text.contains("200") {
                                    pending.status_ok = true;
                                }
                            }
                        }
                        _ if in_prop && !current_qualified.is_empty() => {
                            if let Some(ref mut pending) = propstat {
                                let value = text.trim().to_string();
                                match current_local.as_str() {
                                    "getlastmodified" => {
                                        pending.last_modified = Some(value.clone())
                                    }
                                    "getcontenttype" => {
                                        pending.content_type = Some(value.clone())
                                    }
                                    _ => {}
                                }
                                pending.properties.insert(current_qualified.clone(), value);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                let local = local_name(e.name())?;

                match local.as_str() {
                    "propstat" => {
                        if let Some(pending) = propstat.take() {
                            if pending.status_ok {
                                if let Some(ref mut resp) = current {
                                    resp.merge(pending);
                                }
                            }
                        }
                    }
                    "response" => {
                        if let Some(resp) = current.take() {
                            if resp.has_ok_propstat && !resp.href.is_empty() {
                                resources.push(resp.into_descriptor());
                            }
                        }
                    }
                    "prop" => {
                        in_prop = false;
                    }
                    "resourcetype" => {
                        in_resourcetype = false;
                    }
                    _ => {}
                }

                current_local.clear();
                current_qualified.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DavError::Xml(e)),
            _ => {}
        }

        buf.clear();
    }

    Ok(resources)
}

impl ResponseState {
    fn merge(&mut self, pending: PropstatState) {
        self.has_ok_propstat = true;
        self.is_collection |= pending.is_collection;
        if pending.last_modified.is_some() {
            self.last_modified = pending.last_modified;
        }
        if pending.content_type.is_some() {
            self.content_type = pending.content_type;
        }
        self.properties.extend(pending.properties);
    }

    fn into_descriptor(self) -> ResourceDescriptor {
        let decoded = match urlencoding::decode(&self.href) {
            Ok(path) => path.into_owned(),
            Err(_) => self.href.clone(),
        };

        let trimmed = decoded.trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        };

        let resource_type = if self.is_collection {
            ResourceType::Collection
        } else {
            ResourceType::File
        };

        ResourceDescriptor {
            path,
            resource_type,
            last_modified: self.last_modified,
            // collections have no intrinsic mime type
            mime_type: if self.is_collection { None } else { self.content_type },
            properties: self.properties,
        }
    }
}

fn local_name(name: QName<'_>) -> Result<String> {
    let local = name.local_name();
    let name = str::from_utf8(local.as_ref())
        .map_err(|e| DavError::Response(format!("invalid UTF-8 in element name: {}", e)))?;
    Ok(name.to_string())
}

fn qualified_name(name: QName<'_>) -> Result<String> {
    let local = local_name(name)?;
    match name.prefix() {
        Some(prefix) => {
            let prefix = str::from_utf8(prefix.as_ref()).map_err(|e| {
                DavError::Response(format!("invalid UTF-8 in namespace prefix: {}", e))
            })?;
            Ok(format!("{}:{}", prefix, local))
        }
        None => Ok(local),
    }
}

/// Parses the server's last-modified timestamp. WebDAV servers use RFC 2822
/// HTTP dates; RFC 3339 and the bare HTTP-date format are fallbacks.
pub(crate) fn parse_http_date(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc2822(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(date_str)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT")
                .ok()
                .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        })
}
