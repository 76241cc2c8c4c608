//! Staff authentication service.
//!
//! Provides password login for staff and the startup bootstrap that seeds
//! staff accounts from configured credentials.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;
use sqlx::SqlitePool;

use clearspring_core::StaffRole;

use crate::config::{StaffBootstrap, StaffCredentials};
use crate::db::StaffRepository;
use crate::models::StaffAccount;

/// Outcome of seeding staff accounts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Usernames that were created.
    pub created: Vec<String>,
    /// Usernames that already existed and were left untouched.
    pub existing: Vec<String>,
}

/// Authentication service.
///
/// Handles staff login and account creation.
pub struct AuthService<'a> {
    staff: StaffRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            staff: StaffRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong. The two cases are not distinguished.
    pub async fn login(&self, username: &str, password: &str) -> Result<StaffAccount, AuthError> {
        let account = self
            .staff
            .get_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &account.password_hash)?;

        Ok(account)
    }

    /// Create a staff account with a freshly hashed password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyUsername` / `EmptyPassword` for blank input,
    /// `AuthError::Repository` if the username is taken or the insert fails.
    pub async fn create_account(
        &self,
        username: &str,
        password: &str,
        role: StaffRole,
    ) -> Result<StaffAccount, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let password_hash = hash_password(password)?;
        let account = self.staff.create(username, &password_hash, role).await?;

        tracing::info!(staff = %account.username, role = %account.role, "Staff account created");
        Ok(account)
    }

    /// Create every configured staff account that does not exist yet.
    ///
    /// Existing accounts (matched by username) are never modified, so this is
    /// safe to run on every startup.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if a lookup or insert fails.
    pub async fn seed_staff_accounts(
        &self,
        bootstrap: &StaffBootstrap,
    ) -> Result<SeedReport, AuthError> {
        let mut report = SeedReport::default();

        for credentials in bootstrap.accounts() {
            if self.seed_one(credentials).await? {
                report.created.push(credentials.username.clone());
            } else {
                report.existing.push(credentials.username.clone());
            }
        }

        Ok(report)
    }

    async fn seed_one(&self, credentials: &StaffCredentials) -> Result<bool, AuthError> {
        if self
            .staff
            .get_by_username(credentials.username.trim())
            .await?
            .is_some()
        {
            tracing::debug!(staff = %credentials.username, "Staff account already exists");
            return Ok(false);
        }

        self.create_account(
            &credentials.username,
            credentials.password.expose_secret(),
            credentials.role,
        )
        .await?;
        Ok(true)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::db::test_pool;

    fn creds(username: &str, password: &str, role: StaffRole) -> StaffCredentials {
        StaffCredentials {
            username: username.to_string(),
            password: SecretString::from(password),
            role,
        }
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("correct horse").unwrap();
        assert!(!hash.contains("correct horse"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_success() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        let created = auth
            .create_account("boss", "s3cret", StaffRole::Admin)
            .await
            .unwrap();

        let account = auth.login("boss", "s3cret").await.unwrap();
        assert_eq!(account.id, created.id);
        assert_eq!(account.role, StaffRole::Admin);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        auth.create_account("boss", "s3cret", StaffRole::Admin)
            .await
            .unwrap();

        let wrong_password = auth.login("boss", "guess").await.unwrap_err();
        let unknown_user = auth.login("nobody", "s3cret").await.unwrap_err();
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_create_account_rejects_blank_input() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.create_account("  ", "pw", StaffRole::Admin).await,
            Err(AuthError::EmptyUsername)
        ));
        assert!(matches!(
            auth.create_account("boss", "", StaffRole::Admin).await,
            Err(AuthError::EmptyPassword)
        ));
    }

    #[tokio::test]
    async fn test_seed_creates_only_configured_roles() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        let bootstrap = StaffBootstrap {
            admin: None,
            manager: Some(creds("mgr1", "pw", StaffRole::Manager)),
        };

        let report = auth.seed_staff_accounts(&bootstrap).await.unwrap();
        assert_eq!(report.created, vec!["mgr1".to_string()]);
        assert!(report.existing.is_empty());

        let accounts = StaffRepository::new(&pool).list().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].role, StaffRole::Manager);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_and_keeps_existing_password() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let first = StaffBootstrap {
            admin: Some(creds("boss", "original", StaffRole::Admin)),
            manager: None,
        };
        auth.seed_staff_accounts(&first).await.unwrap();

        let second = StaffBootstrap {
            admin: Some(creds("boss", "changed", StaffRole::Admin)),
            manager: Some(creds("mgr1", "pw", StaffRole::Manager)),
        };
        let report = auth.seed_staff_accounts(&second).await.unwrap();
        assert_eq!(report.created, vec!["mgr1".to_string()]);
        assert_eq!(report.existing, vec!["boss".to_string()]);

        assert!(auth.login("boss", "original").await.is_ok());
        assert!(auth.login("boss", "changed").await.is_err());
    }

    #[tokio::test]
    async fn test_seed_with_nothing_configured() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let report = auth
            .seed_staff_accounts(&StaffBootstrap::default())
            .await
            .unwrap();
        assert_eq!(report, SeedReport::default());
        assert!(StaffRepository::new(&pool).list().await.unwrap().is_empty());
    }
}
