//! Tracker authentication

use base64::Engine;

/// HTTP Basic credentials built from the API token alone.
pub struct TokenAuth {
    api_token: String,
}

impl TokenAuth {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// `Authorization` header value. The encoded payload is the raw token with
    /// no `user:` prefix.
    pub fn to_basic_auth(&self) -> String {
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(&self.api_token)
        )
    }
}
