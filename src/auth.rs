/// Identity collaborators for the current session.
///
/// How the user and token are obtained (cookies, OAuth, env) is up to the
/// host application; the client only reads them.
pub trait Session: Send + Sync {
    /// User id the DAV root belongs to, if authenticated.
    fn user_id(&self) -> Option<String>;

    /// Security token attached to every outgoing DAV request.
    fn request_token(&self) -> Option<String>;
}

/// Fixed credentials, for tests and non-interactive deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    pub user_id: Option<String>,
    pub request_token: Option<String>,
}

impl StaticSession {
    pub fn new(user_id: impl Into<String>, request_token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            request_token: Some(request_token.into()),
        }
    }
}

impl Session for StaticSession {
    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn request_token(&self) -> Option<String> {
        self.request_token.clone()
    }
}
