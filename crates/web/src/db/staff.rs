//! Staff account repository (the credential store).

use sqlx::SqlitePool;

use clearspring_core::{StaffAccountId, StaffRole};

use super::RepositoryError;
use crate::models::StaffAccount;

/// Raw `staff_account` row.
#[derive(sqlx::FromRow)]
struct StaffRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl TryFrom<StaffRow> for StaffAccount {
    type Error = RepositoryError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<StaffRole>().map_err(|e| {
            RepositoryError::DataCorruption(format!("staff account {}: {e}", row.id))
        })?;

        Ok(Self {
            id: StaffAccountId::new(row.id),
            username: row.username,
            password_hash: row.password_hash,
            role,
        })
    }
}

/// Repository for staff account database operations.
pub struct StaffRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a staff account by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_by_id(
        &self,
        id: StaffAccountId,
    ) -> Result<Option<StaffAccount>, RepositoryError> {
        sqlx::query_as::<_, StaffRow>(
            "SELECT id, username, password_hash, role FROM staff_account WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(StaffAccount::try_from)
        .transpose()
    }

    /// Get a staff account by username (exact match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is invalid.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StaffAccount>, RepositoryError> {
        sqlx::query_as::<_, StaffRow>(
            "SELECT id, username, password_hash, role FROM staff_account WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .map(StaffAccount::try_from)
        .transpose()
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        role: StaffRole,
    ) -> Result<StaffAccount, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(
            r"
            INSERT INTO staff_account (username, password_hash, role)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, role
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        StaffAccount::try_from(row)
    }

    /// List all staff accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<StaffAccount>, RepositoryError> {
        sqlx::query_as::<_, StaffRow>(
            "SELECT id, username, password_hash, role FROM staff_account ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(StaffAccount::try_from)
        .collect()
    }
}
