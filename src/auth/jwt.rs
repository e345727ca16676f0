use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::{claims::Claims, repo_types::User};
use crate::{config::JwtConfig, error::AppError, state::AppState};

/// Tokens are valid for one day from issuance.
pub const TOKEN_TTL: Duration = Duration::hours(24);

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Signing and verification keys derived from the configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self::from_secret(cfg.secret.as_bytes())
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn sign(&self, user: &User) -> Result<String, AppError> {
        self.sign_at(user, OffsetDateTime::now_utc())
    }

    pub(crate) fn sign_at(&self, user: &User, now: OffsetDateTime) -> Result<String, AppError> {
        let exp = now + TOKEN_TTL;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
        };
        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("jwt encode: {e}")))?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry. Issuer and audience are not checked.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            warn!(error = %e, "jwt rejected");
            AppError::InvalidToken
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$unused".into(),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let u = user();
        let token = keys.sign(&u).expect("sign");
        assert_eq!(token.split('.').count(), 3);

        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn header_uses_hs512() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let token = keys.sign(&user()).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let issued = OffsetDateTime::now_utc() - TOKEN_TTL - Duration::seconds(5);
        let token = keys.sign_at(&user(), issued).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn accepts_token_close_to_expiry() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let issued = OffsetDateTime::now_utc() - TOKEN_TTL + Duration::minutes(1);
        let token = keys.sign_at(&user(), issued).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn rejects_token_signed_with_other_key() {
        let ours = JwtKeys::from_secret(b"secret-one");
        let theirs = JwtKeys::from_secret(b"secret-two");
        let token = theirs.sign(&user()).unwrap();
        assert!(matches!(ours.verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_tampered_payload() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let token = keys.sign(&user()).unwrap();
        let other = keys.sign(&user()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert!(matches!(keys.verify(&forged), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_malformed_token() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        assert!(matches!(keys.verify("invalid.token.here"), Err(AppError::InvalidToken)));
        assert!(matches!(keys.verify(""), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_other_algorithm() {
        let keys = JwtKeys::from_secret(b"dev-secret");
        let u = user();
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: u.id,
            email: u.email,
            username: u.username,
            iat: now.unix_timestamp() as usize,
            exp: (now + TOKEN_TTL).unix_timestamp() as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::InvalidToken)));
    }
}
