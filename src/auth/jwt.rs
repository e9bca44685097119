use crate::models::{Claims, TokenType};
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Decode and check an HS256 access token. Refresh tokens are rejected here;
/// they are only good at the identity service.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, String> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())?;

    if claims.token_type != TokenType::Access {
        return Err("Not an access token".to_string());
    }

    Ok(claims)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) const SECRET: &str = "test-secret";

    pub(crate) fn token(role: u8, employee_id: Option<u64>, token_type: TokenType) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            user_id: 11,
            sub: "jane".into(),
            role,
            exp: now + 900,
            jti: "test-jti".into(),
            token_type,
            employee_id,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_access_tokens() {
        let claims = verify_access_token(&token(2, Some(7), TokenType::Access), SECRET).unwrap();
        assert_eq!(claims.user_id, 11);
        assert_eq!(claims.role, 2);
        assert_eq!(claims.employee_id, Some(7));
    }

    #[test]
    fn rejects_refresh_tokens_and_wrong_secret() {
        assert!(verify_access_token(&token(2, Some(7), TokenType::Refresh), SECRET).is_err());
        assert!(verify_access_token(&token(2, Some(7), TokenType::Access), "other").is_err());
        assert!(verify_access_token("not-a-jwt", SECRET).is_err());
    }
}
