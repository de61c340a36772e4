use std::fmt;

use anyhow::{bail, Context, Result};

/// Process-wide configuration, read from the environment once at startup and
/// passed by reference into the service. Never mutated afterwards.
pub struct AppConfig {
    /// argon2 time-cost. Tunable per deployment so slower hardware can keep
    /// login latency acceptable without a code change.
    pub hash_cost: u32,
    /// HS256 signing secret for session tokens. Confidential.
    pub jwt_secret: String,
    pub db_path: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let hash_cost = std::env::var("HASH_COST")
            .context("HASH_COST is not set")?
            .parse::<u32>()
            .context("HASH_COST must be a positive integer")?;
        if hash_cost == 0 {
            bail!("HASH_COST must be a positive integer");
        }

        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let db_path = std::env::var("DB_PATH").unwrap_or_else(|_| "userdb".into());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

        Ok(Self {
            hash_cost,
            jwt_secret,
            db_path,
            bind_addr,
        })
    }
}

// Keeps the signing secret out of debug logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("hash_cost", &self.hash_cost)
            .field("jwt_secret", &"<redacted>")
            .field("db_path", &self.db_path)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn debug_output_redacts_secret() {
        let config = AppConfig {
            hash_cost: 2,
            jwt_secret: "supersecret123".into(),
            db_path: "userdb".into(),
            bind_addr: "0.0.0.0:3000".into(),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("supersecret123"));
        assert!(printed.contains("<redacted>"));
    }
}
