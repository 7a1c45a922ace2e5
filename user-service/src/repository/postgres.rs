//! PostgreSQL user repository
//!
//! List queries are composed with [`sqlx::QueryBuilder`] so that filter
//! values are always bound as parameters. The requested sort column is
//! emitted as a quoted identifier: an unknown column is rejected by
//! PostgreSQL instead of being spliced into the statement.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{FilterCondition, FilterValue, OrderDirection, Pagination};
use super::traits::{HealthCheck, Repository, RepositoryResult, SoftDeleteRepository};
use crate::models::{CreateUser, UpdateUser, User, UserId};

const ENTITY: &str = "User";

/// `UserRepository` backed by a PostgreSQL pool
///
/// Cloning is cheap; `PgPool` is reference counted.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Quote an identifier for PostgreSQL, doubling embedded quotes
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Build the list statement for live users
///
/// Shape: `SELECT .. FROM users WHERE deleted_at IS NULL [AND "f" = $n]..
/// ORDER BY "col" DIR, id ASC LIMIT $n OFFSET $m`.
pub(crate) fn select_users<'a>(
    filters: &[FilterCondition],
    order_by: Option<(&str, OrderDirection)>,
    pagination: Option<Pagination>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, created_at, updated_at, deleted_at, name, age FROM users WHERE deleted_at IS NULL",
    );

    for filter in filters {
        builder.push(" AND ");
        builder.push(quote_ident(&filter.field));
        builder.push(" = ");
        match filter.value {
            FilterValue::Integer(n) => builder.push_bind(n),
            FilterValue::String(ref s) => builder.push_bind(s.clone()),
        };
    }

    builder.push(" ORDER BY ");
    if let Some((column, direction)) = order_by {
        builder.push(quote_ident(column));
        builder.push(" ");
        builder.push(direction.as_sql());
        builder.push(", ");
    }
    // Tie-breaker so pages never overlap
    builder.push("id ASC");

    if let Some(page) = pagination {
        builder.push(" LIMIT ");
        builder.push_bind(i64::try_from(page.limit).unwrap_or(i64::MAX));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(page.offset).unwrap_or(i64::MAX));
    }

    builder
}

impl Repository<UserId, User, CreateUser, UpdateUser> for PgUserRepository {
    async fn find_by_id(&self, id: &UserId) -> RepositoryResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, created_at, updated_at, deleted_at, name, age \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindById, e))
    }

    async fn find_all(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<User>> {
        let mut builder = select_users(filters, order_by, pagination);
        tracing::debug!(sql = builder.sql(), "listing users");

        builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindAll, e))
    }

    async fn create(&self, data: CreateUser) -> RepositoryResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, age) VALUES ($1, $2) \
             RETURNING id, created_at, updated_at, deleted_at, name, age",
        )
        .bind(&data.name)
        .bind(data.age)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(RepositoryOperation::Create, e).with_entity(ENTITY, data.name.clone())
        })
    }

    async fn update(&self, id: &UserId, data: UpdateUser) -> RepositoryResult<User> {
        let op = RepositoryOperation::Update;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::from_sqlx(op, e))?;

        // Row lock keeps a concurrent soft delete from slipping between read and write
        let current = sqlx::query_as::<_, User>(
            "SELECT id, created_at, updated_at, deleted_at, name, age \
             FROM users WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(op, e))?;

        let Some(mut user) = current else {
            return Err(RepositoryError::not_found(ENTITY, id.to_string()).with_operation(op));
        };
        data.apply_to(&mut user);

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, age = $3, updated_at = NOW() WHERE id = $1 \
             RETURNING id, created_at, updated_at, deleted_at, name, age",
        )
        .bind(id)
        .bind(&user.name)
        .bind(user.age)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_sqlx(op, e).with_entity(ENTITY, user.name.clone()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::from_sqlx(op, e))?;

        Ok(updated)
    }
}

impl SoftDeleteRepository<UserId, User, CreateUser, UpdateUser> for PgUserRepository {
    async fn soft_delete(&self, id: &UserId) -> RepositoryResult<bool> {
        let affected = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::SoftDelete, e))?
        .rows_affected();

        Ok(affected > 0)
    }
}

impl HealthCheck for PgUserRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Ping, e))?;
        Ok(())
    }
}
