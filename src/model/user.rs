use serde::{Deserialize, Serialize};

/// Durable account record. `username` is the unique lookup key;
/// `password_hash` is an argon2 PHC string, never the raw password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub device_type: String, // last seen client category, advisory only
    pub created_ts: i64,
}

impl UserRecord {
    pub fn new(name: &str, username: &str, password_hash: String, device_type: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            username: username.to_string(),
            password_hash,
            device_type: device_type.to_string(),
            created_ts: chrono::Utc::now().timestamp(),
        }
    }
}
