//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use petwatch_core::config::AuthConfig;
use petwatch_core::error::AppError;

use super::claims::Claims;

/// Validates HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => {
                        AppError::unauthorized("Invalid token audience")
                    }
                    _ => AppError::unauthorized("Token validation failed"),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use petwatch_core::error::ErrorKind;
    use petwatch_core::types::UserId;

    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            audience: None,
            leeway_seconds: 5,
        }
    }

    fn token(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encode")
    }

    fn claims(exp_offset: i64) -> Claims {
        Claims {
            sub: UserId::new(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iat: None,
            aud: None,
            email: None,
        }
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let c = claims(3600);
        let decoded = JwtDecoder::new(&config())
            .decode(&token("test-secret", &c))
            .expect("valid");
        assert_eq!(decoded.user_id(), c.sub);
    }

    #[test]
    fn test_expired_token_rejected() {
        let err = JwtDecoder::new(&config())
            .decode(&token("test-secret", &claims(-600)))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let err = JwtDecoder::new(&config())
            .decode(&token("other-secret", &claims(3600)))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let mut cfg = config();
        cfg.audience = Some("authenticated".to_string());
        let decoder = JwtDecoder::new(&cfg);

        let mut c = claims(3600);
        assert!(decoder.decode(&token("test-secret", &c)).is_err());
        c.aud = Some("authenticated".to_string());
        assert!(decoder.decode(&token("test-secret", &c)).is_ok());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(JwtDecoder::new(&config()).decode("not.a.jwt").is_err());
    }
}
