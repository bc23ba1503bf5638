//! Cross-origin access policy.

use crate::config::DEFAULT_ALLOWED_ORIGINS;

/// Methods advertised to allowed origins.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Request headers advertised to allowed origins.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Restricts browser callers to an approved set of origins.
///
/// Requests from an allowed origin get the origin echoed back in
/// `Access-Control-Allow-Origin`. Any other origin gets no CORS headers and
/// the browser blocks the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()))
    }
}

impl CorsPolicy {
    /// Creates a policy from a list of origins. Trailing slashes are ignored.
    pub fn new(origins: impl IntoIterator<Item = String>) -> Self {
        let allowed_origins = origins
            .into_iter()
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty())
            .collect();
        Self { allowed_origins }
    }

    /// Allowed origins in configuration order.
    pub fn origins(&self) -> &[String] {
        &self.allowed_origins
    }

    /// Returns true if `origin` may call the API.
    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }

    /// Headers to attach to an ordinary response.
    pub fn response_headers(&self, origin: Option<&str>) -> Vec<(String, String)> {
        match origin {
            Some(origin) if self.allows(origin) => vec![
                ("Access-Control-Allow-Origin".to_string(), origin.to_string()),
                ("Vary".to_string(), "Origin".to_string()),
            ],
            _ => Vec::new(),
        }
    }

    /// Headers to attach to a preflight (`OPTIONS`) response.
    pub fn preflight_headers(&self, origin: Option<&str>) -> Vec<(String, String)> {
        let mut headers = self.response_headers(origin);
        if !headers.is_empty() {
            headers.push((
                "Access-Control-Allow-Methods".to_string(),
                ALLOWED_METHODS.to_string(),
            ));
            headers.push((
                "Access-Control-Allow-Headers".to_string(),
                ALLOWED_HEADERS.to_string(),
            ));
        }
        headers
    }
}
