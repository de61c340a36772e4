use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed session lifetime.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

/// Sign a session token for a successful login. Self-contained: verification
/// needs only the secret, no store lookup.
pub fn issue_token(secret: &str, user_id: &str, username: &str) -> anyhow::Result<String> {
    issue_token_with_ttl(secret, user_id, username, TOKEN_TTL_SECS)
}

fn issue_token_with_ttl(
    secret: &str,
    user_id: &str,
    username: &str,
    ttl_secs: i64,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now as usize,
        exp: (now + ttl_secs) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_token(secret: &str, token: &str) -> anyhow::Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::{decode_token, issue_token, issue_token_with_ttl, TOKEN_TTL_SECS};

    const SECRET: &str = "test-secret";

    #[test]
    fn fresh_token_verifies_and_carries_identity() {
        let token = issue_token(SECRET, "user-1", "alice").unwrap();
        let claims = decode_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS as usize);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token_with_ttl(SECRET, "user-1", "alice", -120).unwrap();
        assert!(decode_token(SECRET, &token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token("other-secret", "user-1", "alice").unwrap();
        assert!(decode_token(SECRET, &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(SECRET, "user-1", "alice").unwrap();
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(decode_token(SECRET, &tampered).is_err());
    }
}
