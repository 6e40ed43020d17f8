//! JWT token issuance and decoding (HS256)

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Deserialize;
use std::fmt::Debug;

use crate::domain::auth::{TokenClaims, TokenError, DEFAULT_TOKEN_TTL_SECS};

/// Configuration for JWT service
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_secs: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Configuration with the default 24 hour lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(secret, DEFAULT_TOKEN_TTL_SECS)
    }
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Produces and checks signed, self-contained bearer tokens
pub trait TokenCodec: Send + Sync + Debug {
    /// Issue a token for a subject at time `now` (epoch seconds)
    fn issue(&self, user_id: &str, now: i64) -> Result<String, TokenError>;

    /// Decode a token, checking signature, then expiry, then subject
    fn decode(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError>;
}

/// Claims as they appear on the wire. Tokens minted by the previous service
/// carry the subject under `userId`.
#[derive(Debug, Deserialize)]
struct WireClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// JWT service implementation using a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Expiry and subject are checked by hand against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl TokenCodec for JwtService {
    fn issue(&self, user_id: &str, now: i64) -> Result<String, TokenError> {
        let claims = TokenClaims::new(user_id, now, self.config.ttl_secs);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn decode(&self, token: &str, now: i64) -> Result<TokenClaims, TokenError> {
        let data = decode::<WireClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::Json(inner) => TokenError::MalformedClaims(inner.to_string()),
                _ => TokenError::InvalidSignature,
            },
        )?;
        let wire = data.claims;

        let exp = wire
            .exp
            .ok_or_else(|| TokenError::MalformedClaims("missing exp".to_string()))?;
        if exp <= now {
            return Err(TokenError::Expired);
        }

        let sub = wire
            .sub
            .filter(|s| !s.is_empty())
            .or(wire.user_id)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| TokenError::MalformedClaims("missing subject".to_string()))?;

        Ok(TokenClaims {
            sub,
            iat: wire.iat.unwrap_or_default(),
            exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const NOW: i64 = 1_700_000_000;

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig::with_secret(secret))
    }

    fn sign_raw(secret: &str, claims: serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = service("s1");
        let token = codec.issue("0123456789abcdef0123456789abcdef", NOW).unwrap();

        assert_eq!(token.split('.').count(), 3);

        let claims = codec.decode(&token, NOW).unwrap();
        assert_eq!(claims.sub, "0123456789abcdef0123456789abcdef");
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 86_400);
    }

    #[test]
    fn test_decode_expired() {
        let codec = service("s1");
        let token = codec.issue("user-1", NOW).unwrap();

        assert_ok!(codec.decode(&token, NOW + 86_399));
        assert_eq!(codec.decode(&token, NOW + 86_400), Err(TokenError::Expired));
        assert_eq!(codec.decode(&token, NOW + 86_401), Err(TokenError::Expired));
    }

    #[test]
    fn test_custom_ttl() {
        let codec = JwtService::new(JwtConfig::new("s1", 60));
        let token = codec.issue("user-1", NOW).unwrap();

        assert_eq!(codec.decode(&token, NOW).unwrap().exp, NOW + 60);
        assert_eq!(codec.decode(&token, NOW + 60), Err(TokenError::Expired));
    }

    #[test]
    fn test_oversized_ttl_is_not_expired_on_issue() {
        let codec = JwtService::new(JwtConfig::new("s1", u64::MAX));
        let token = codec.issue("user-1", NOW).unwrap();

        let claims = codec.decode(&token, NOW).unwrap();
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_decode_wrong_secret() {
        let token = service("s1").issue("user-1", NOW).unwrap();

        assert_eq!(
            service("s2").decode(&token, NOW),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let token = service("s1").issue("user-1", NOW).unwrap();

        assert_eq!(
            service("s2").decode(&token, NOW + 1_000_000),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_garbage() {
        let codec = service("s1");

        assert_err!(codec.decode("not.a.token", NOW));
        assert_err!(codec.decode("", NOW));
    }

    #[test]
    fn test_decode_missing_subject() {
        let token = sign_raw("s1", json!({"iat": NOW, "exp": NOW + 60}));

        assert!(matches!(
            service("s1").decode(&token, NOW),
            Err(TokenError::MalformedClaims(_))
        ));
    }

    #[test]
    fn test_decode_empty_subject() {
        let token = sign_raw("s1", json!({"sub": "", "iat": NOW, "exp": NOW + 60}));

        assert!(matches!(
            service("s1").decode(&token, NOW),
            Err(TokenError::MalformedClaims(_))
        ));
    }

    #[test]
    fn test_decode_legacy_user_id_claim() {
        let token = sign_raw("s1", json!({"userId": "legacy-id", "iat": NOW, "exp": NOW + 60}));

        let claims = service("s1").decode(&token, NOW).unwrap();
        assert_eq!(claims.sub, "legacy-id");
    }

    #[test]
    fn test_decode_rejects_other_algorithm() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &json!({"sub": "user-1", "exp": NOW + 60}),
            &EncodingKey::from_secret(b"s1"),
        )
        .unwrap();

        assert_eq!(
            service("s1").decode(&token, NOW),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", service("super-secret"));

        assert!(!rendered.contains("super-secret"));
    }
}
