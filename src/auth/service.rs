use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, warn};

use crate::auth::error::AuthError;
use crate::auth::{password, token};
use crate::config::AppConfig;
use crate::model::UserRecord;
use crate::store::{CredentialStore, StoreError};

/// Store calls that outlive this are reported as unavailable rather than
/// left hanging on the request.
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    config: Arc<AppConfig>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Create an account. No token is issued here; the caller logs in
    /// separately.
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        password: &str,
        device_type: &str,
    ) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput);
        }

        // Advisory fast path. The insert below is the real uniqueness gate;
        // two concurrent registrations can both pass this check.
        let existing = store_call(self.store.find_by_username(username)).await?;
        if existing.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let hash = password::hash_password(password, self.config.hash_cost).map_err(|err| {
            error!(%username, "password hashing failed: {err:#}");
            AuthError::StoreUnavailable
        })?;

        // A duplicate here means we lost the race to another registration;
        // it surfaces as UsernameTaken just like the fast path.
        let record = UserRecord::new(name, username, hash, device_type);
        store_call(self.store.insert(&record)).await
    }

    /// Authenticate and issue a one-hour session token. Unknown usernames and
    /// wrong passwords fail identically.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_type: &str,
    ) -> Result<String, AuthError> {
        let record = store_call(self.store.find_by_username(username))
            .await?
            .ok_or(AuthError::AuthFailed)?;

        let verified =
            password::verify_password(&record.password_hash, password).map_err(|err| {
                error!(%username, "password verification failed: {err:#}");
                AuthError::StoreUnavailable
            })?;
        if !verified {
            return Err(AuthError::AuthFailed);
        }

        // Advisory metadata; a failed update never blocks the login.
        if let Err(err) = store_call(self.store.update_device_type(username, device_type)).await {
            warn!(%username, "device type update failed: {err:?}");
        }

        token::issue_token(&self.config.jwt_secret, &record.id, &record.username).map_err(|err| {
            error!(%username, "token signing failed: {err:#}");
            AuthError::StoreUnavailable
        })
    }
}

async fn store_call<T>(
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, AuthError> {
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(StoreError::Duplicate)) => Err(AuthError::UsernameTaken),
        Ok(Err(StoreError::NotFound)) => Err(AuthError::StoreUnavailable),
        Ok(Err(StoreError::Backend(err))) => {
            error!("store backend failure: {err:#}");
            Err(AuthError::StoreUnavailable)
        }
        Err(_) => {
            error!("store call timed out after {STORE_TIMEOUT:?}");
            Err(AuthError::StoreUnavailable)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::AuthService;
    use crate::auth::error::AuthError;
    use crate::auth::token;
    use crate::config::AppConfig;
    use crate::model::UserRecord;
    use crate::store::{CredentialStore, MemoryStore, StoreError};

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            hash_cost: 1, // keep hashing fast in tests
            jwt_secret: "test-secret".into(),
            db_path: String::new(),
            bind_addr: String::new(),
        })
    }

    fn service_with(store: Arc<dyn CredentialStore>) -> AuthService {
        AuthService::new(store, test_config())
    }

    fn service() -> AuthService {
        service_with(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn register_then_reregister_same_username() {
        let svc = service();

        svc.register("Alice", "alice", "s3cret", "DESKTOP")
            .await
            .unwrap();
        let err = svc
            .register("Other Alice", "alice", "different", "PHONE")
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::UsernameTaken);
    }

    #[tokio::test]
    async fn register_rejects_empty_fields() {
        let svc = service();

        assert_eq!(
            svc.register("Alice", "", "s3cret", "DESKTOP").await,
            Err(AuthError::InvalidInput)
        );
        assert_eq!(
            svc.register("Alice", "alice", "", "DESKTOP").await,
            Err(AuthError::InvalidInput)
        );
    }

    #[tokio::test]
    async fn login_with_correct_and_wrong_password() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone());

        svc.register("Alice", "alice", "s3cret", "DESKTOP")
            .await
            .unwrap();

        let jwt = svc.login("alice", "s3cret", "TABLET").await.unwrap();
        let claims = token::decode_token("test-secret", &jwt).unwrap();
        assert_eq!(claims.username, "alice");

        let record = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(claims.sub, record.id);

        let err = svc.login("alice", "wrong", "TABLET").await.unwrap_err();
        assert_eq!(err, AuthError::AuthFailed);
    }

    #[tokio::test]
    async fn unknown_user_fails_same_as_wrong_password() {
        let svc = service();
        svc.register("Alice", "alice", "s3cret", "DESKTOP")
            .await
            .unwrap();

        let wrong_password = svc.login("alice", "wrong", "DESKTOP").await.unwrap_err();
        let unknown_user = svc.login("nobody", "anything", "DESKTOP").await.unwrap_err();
        assert_eq!(wrong_password, unknown_user);
        assert_eq!(unknown_user, AuthError::AuthFailed);
    }

    #[tokio::test]
    async fn login_updates_device_type() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone());

        svc.register("Alice", "alice", "s3cret", "DESKTOP")
            .await
            .unwrap();
        svc.login("alice", "s3cret", "PHONE").await.unwrap();

        let record = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(record.device_type, "PHONE");
    }

    #[tokio::test]
    async fn failed_login_leaves_device_type_untouched() {
        let store = Arc::new(MemoryStore::new());
        let svc = service_with(store.clone());

        svc.register("Alice", "alice", "s3cret", "DESKTOP")
            .await
            .unwrap();
        let _ = svc.login("alice", "wrong", "PHONE").await;

        let record = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(record.device_type, "DESKTOP");
    }

    #[tokio::test]
    async fn concurrent_registration_has_exactly_one_winner() {
        let svc = Arc::new(service());
        let mut handles = Vec::new();

        for i in 0..8 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                svc.register(&format!("Racer {i}"), "alice", "s3cret", "DESKTOP")
                    .await
            }));
        }

        let mut winners = 0;
        let mut taken = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => winners += 1,
                Err(AuthError::UsernameTaken) => taken += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(taken, 7);
    }

    /// Store whose lookups fail outright, standing in for a down backend.
    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<UserRecord>, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }

        async fn insert(&self, _record: &UserRecord) -> Result<(), StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }

        async fn update_device_type(
            &self,
            _username: &str,
            _device_type: &str,
        ) -> Result<(), StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("connection refused")))
        }
    }

    #[tokio::test]
    async fn backend_failure_surfaces_as_store_unavailable() {
        let svc = service_with(Arc::new(BrokenStore));

        assert_eq!(
            svc.register("Alice", "alice", "s3cret", "DESKTOP").await,
            Err(AuthError::StoreUnavailable)
        );
        assert_eq!(
            svc.login("alice", "s3cret", "DESKTOP").await,
            Err(AuthError::StoreUnavailable)
        );
    }
}
