use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{error::Error as StdError, fmt};
use uuid::Uuid;

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug)]
pub enum TokenError {
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    InvalidSubUuid,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidSubUuid => write!(f, "invalid 'sub' (expected UUID)"),
        }
    }
}

impl StdError for TokenError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Access token (JWT) claims.
///
/// `sub` is the user id (project convention: UUID), `role` is the active role
/// name ("ADMIN" grants the admin surface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Verified, application-facing view of the claims.
///
/// `sub` is promoted to `Uuid`; signature/expiry are already guaranteed by
/// `verify_strict`.
#[derive(Debug, Clone)]
pub struct VerifiedAccessToken {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

/// HS256 access-token issuer + verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Sign a token for an authenticated user.
    pub fn issue(&self, user_id: Uuid, email: &str, role: &str) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };

        let header = Header::new(Algorithm::HS256);
        Ok(jsonwebtoken::encode(&header, &claims, &self.encoding_key)?)
    }

    // Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, jsonwebtoken::errors::Error> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Verify + strict claim validation.
    ///
    /// `jsonwebtoken::Validation` already checks the signature and `exp`;
    /// this method additionally requires non-empty `sub`/`email`/`role` and a
    /// UUID subject.
    pub fn verify_strict(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let claims = self.verify(token)?;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::EmptyClaim("sub"));
        }
        if claims.email.trim().is_empty() {
            return Err(TokenError::EmptyClaim("email"));
        }
        if claims.role.trim().is_empty() {
            return Err(TokenError::EmptyClaim("role"));
        }
        if claims.exp == 0 {
            return Err(TokenError::EmptyClaim("exp"));
        }

        // Project convention: subject is a UUID
        if Uuid::parse_str(&claims.sub).is_err() {
            return Err(TokenError::InvalidSubUuid);
        }

        Ok(claims)
    }

    /// Verify + strict claim validation, then convert into the
    /// application-friendly type. Recommended entry-point for middleware.
    pub fn verify_verified(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let claims = self.verify_strict(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::InvalidSubUuid)?;

        Ok(VerifiedAccessToken {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 600, 0)
    }

    #[test]
    fn issue_then_verify_roundtrip() {
        let svc = service();
        let user_id = Uuid::new_v4();

        let token = svc.issue(user_id, "a@example.com", "ADMIN").unwrap();
        let verified = svc.verify_verified(&token).unwrap();

        assert_eq!(verified.user_id, user_id);
        assert_eq!(verified.email, "a@example.com");
        assert_eq!(verified.role, "ADMIN");
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            email: "a@example.com".into(),
            role: "User".into(),
            iat: now - 1200,
            exp: now - 600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(svc.verify_verified(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service()
            .issue(Uuid::new_v4(), "a@example.com", "User")
            .unwrap();
        let other = TokenService::new("other-secret", 600, 0);

        assert!(other.verify_verified(&token).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let svc = service();
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = AccessTokenClaims {
            sub: "42".into(),
            email: "a@example.com".into(),
            role: "User".into(),
            iat: now,
            exp: now + 600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            svc.verify_verified(&token),
            Err(TokenError::InvalidSubUuid)
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(service().verify_verified("not-a-jwt").is_err());
    }
}
