use serde::{Deserialize, Serialize};

/// Capability facets decoded from the server's raw permission string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub read: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
    pub share: bool,
    pub rename: bool,
}

impl Capabilities {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Decodes the server's raw permission string into capability facets.
///
/// The permission grammar is a versioned server-side contract, so the decoder
/// is injected rather than implemented here. Implemented for any matching
/// closure.
pub trait DecodePermissions: Send + Sync {
    fn decode(&self, raw: &str) -> Capabilities;
}

impl<F> DecodePermissions for F
where
    F: Fn(&str) -> Capabilities + Send + Sync,
{
    fn decode(&self, raw: &str) -> Capabilities {
        self(raw)
    }
}

/// Decoder that grants nothing, whatever the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPermissions;

impl DecodePermissions for NoPermissions {
    fn decode(&self, _raw: &str) -> Capabilities {
        Capabilities::none()
    }
}
