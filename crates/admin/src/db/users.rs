//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use boutique_core::catalog::{NewUser, User, UserUpdate};
use boutique_core::{Email, UserId};

use super::{RepositoryError, conflict_or};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            name: row.name,
            email,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, is_admin, created_at, updated_at";

fn email_taken(email: &str) -> String {
    format!("A user with email '{email}' already exists")
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {USER_COLUMNS} FROM catalog."user" ORDER BY created_at DESC, id DESC"#
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    #[instrument(skip(self, user), fields(email = %email))]
    pub async fn create(&self, user: &NewUser, email: &Email) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO catalog."user" (name, email, is_admin)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.name.trim())
        .bind(email.as_str())
        .bind(user.is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or(e, || email_taken(email.as_str())))?;

        row.try_into()
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Conflict` if the new email is already registered.
    /// Returns `RepositoryError::Database` if the update fails otherwise.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: UserId,
        update: &UserUpdate,
        email: Option<&Email>,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE catalog."user" SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                is_admin = COALESCE($4, is_admin),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(email.map(Email::as_str))
        .bind(update.is_admin)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_or(e, || email_taken(email.map_or("", Email::as_str))))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query(r#"DELETE FROM catalog."user" WHERE id = $1"#)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(email: &str) -> UserRow {
        UserRow {
            id: 3,
            name: "Ada".to_string(),
            email: email.to_string(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_user() {
        let user = User::try_from(row("ada@example.com")).unwrap();
        assert_eq!(user.id, UserId::new(3));
        assert_eq!(user.email.as_str(), "ada@example.com");
        assert!(user.is_admin);
    }

    #[test]
    fn test_invalid_stored_email_is_corruption() {
        let err = User::try_from(row("not-an-email")).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }
}
