use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use luncheon_shared::CommentBody;

/// JWT payload claims we read to identify the viewer
#[derive(serde::Deserialize)]
struct TokenClaims {
    sub: String,
    #[serde(default)]
    exp: Option<i64>,
}

/// Who is looking at the thread. Supplied by the auth layer, never looked
/// up by the store itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub current_user_id: Option<String>,
    pub is_authenticated: bool,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            current_user_id: Some(user_id.into()),
            is_authenticated: true,
        }
    }

    /// Derive the viewer from a bearer token's claims. The signature is not
    /// checked here; the backend does that on every request. Undecodable or
    /// expired tokens yield an anonymous viewer.
    pub fn from_bearer_token(token: &str) -> Self {
        let Some(claims) = Self::decode_claims(token) else {
            return Self::anonymous();
        };

        if let Some(exp) = claims.exp {
            if exp <= chrono::Utc::now().timestamp() {
                tracing::debug!("Bearer token expired at {}", exp);
                return Self::anonymous();
            }
        }

        Self::authenticated(claims.sub)
    }

    fn decode_claims(token: &str) -> Option<TokenClaims> {
        // JWT format: header.payload.signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    /// Whether the viewer wrote `body`
    pub fn owns(&self, body: &CommentBody) -> bool {
        self.is_authenticated && self.current_user_id.as_deref() == Some(body.author.id.as_str())
    }
}
