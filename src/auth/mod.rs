use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

pub mod password;

/// Claims embedded in the bearer identity token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, username: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            username,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate a bearer token and extract its claims. Signature and expiry are
/// both checked; any failure is reported as a plain message for the 401 body.
pub fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "alice".to_string());
        let token = generate_jwt(&claims).expect("token");

        let decoded = validate_jwt(&token).expect("valid token");
        assert_eq!(decoded.sub, user_id);
        assert_eq!(decoded.username, "alice");
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string());
        let mut token = generate_jwt(&claims).expect("token");
        token.push('x');
        assert!(validate_jwt(&token).is_err());
    }

    #[test]
    fn expiry_matches_configured_window() {
        let claims = Claims::new(Uuid::new_v4(), "alice".to_string());
        let window = claims.exp - claims.iat;
        assert_eq!(window, 3600);
    }
}
