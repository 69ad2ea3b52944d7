use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::SessionSettings;

/// JWT claims stored in the session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// Display name, so pages can greet the user without a lookup.
    pub name: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token identifier, so two tokens issued in the same second differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// Signing keys plus the cookie settings that go with them. Built once at
/// startup and shared through `AppState`.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub settings: SessionSettings,
}

impl SessionKeys {
    pub fn new(secret: &[u8], settings: SessionSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            settings,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.settings.cookie_name
    }

    /// Issue a session token for the given user.
    pub fn issue(&self, user_id: i64, name: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.settings.ttl_hours)).timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding)
    }

    /// Validate signature and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(token_data.claims)
    }
}
