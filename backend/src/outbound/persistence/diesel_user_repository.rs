//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordDigest, User, UserAccount, UserId, UserName};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation(_) => {
            UserPersistenceError::query("unique constraint violated")
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

/// Convert a stored row into a domain account.
///
/// Rows are written through validated domain types, so a failure here means
/// the table was edited out of band.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |field: &'static str| {
        warn!(user_id = %row.id, field, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user has invalid {field}"))
    };
    let name = UserName::new(&row.name).map_err(|_| corrupt("name"))?;
    let email = Email::new(&row.email).map_err(|_| corrupt("email"))?;
    let user = User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        row.is_admin,
        row.created_at,
    );
    Ok(UserAccount {
        user,
        password: PasswordDigest::new(row.password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_account(row).map(|account| account.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let user = &account.user;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: account.password.as_str(),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
        };

        let result = diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(error) => match classify_diesel_error(&error) {
                DieselFailure::UniqueViolation(_) => {
                    Err(UserPersistenceError::duplicate_email(user.email().as_ref()))
                }
                _ => Err(map_diesel_error(error)),
            },
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for row conversion; query paths run against PostgreSQL
    //! only.
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$v=19$stub".to_owned(),
            is_admin: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn row_to_account_keeps_every_column(row: UserRow) {
        let id = row.id;
        let account = row_to_account(row).expect("valid row");

        assert_eq!(account.user.id().as_uuid(), &id);
        assert_eq!(account.user.email().as_ref(), "ada@example.com");
        assert!(account.user.is_admin());
        assert_eq!(account.password.as_str(), "$argon2id$v=19$stub");
    }

    #[rstest]
    fn row_to_account_rejects_corrupt_email(mut row: UserRow) {
        row.email = "not-an-email".to_owned();

        let err = row_to_account(row).expect_err("corrupt row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
