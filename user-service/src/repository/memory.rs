//! In-process user repository
//!
//! Mirrors the PostgreSQL backend's observable behavior (soft deletes,
//! unique live names, column-name validation at query time) without a
//! database. Used by the handler tests and for local runs with
//! `database.backend = "memory"`.

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{FilterCondition, FilterValue, OrderDirection, Pagination};
use super::traits::{HealthCheck, Repository, RepositoryResult, SoftDeleteRepository};
use crate::models::{CreateUser, Model, UpdateUser, User, UserId};

const ENTITY: &str = "User";

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    last_id: UserId,
}

impl Table {
    fn live(&self, id: UserId) -> Option<&User> {
        self.rows
            .iter()
            .find(|u| u.model.id == id && !u.model.is_deleted())
    }

    fn live_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.rows
            .iter_mut()
            .find(|u| u.model.id == id && !u.model.is_deleted())
    }

    fn name_taken(&self, name: &str, except: Option<UserId>) -> bool {
        self.rows.iter().any(|u| {
            !u.model.is_deleted() && u.name == name && Some(u.model.id) != except
        })
    }
}

/// `UserRepository` keeping rows in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    table: Arc<RwLock<Table>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored, soft-deleted ones included
    pub async fn row_count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

/// Columns of the users table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    Name,
    Age,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Cell<'a> {
    Integer(i64),
    Text(&'a str),
    Timestamp(Option<DateTime<Utc>>),
}

impl Column {
    fn parse(name: &str, operation: RepositoryOperation) -> RepositoryResult<Self> {
        match name {
            "id" => Ok(Self::Id),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "deleted_at" => Ok(Self::DeletedAt),
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            other => Err(RepositoryError::database_error(
                operation,
                format!("column \"{}\" does not exist", other),
            )),
        }
    }

    fn cell<'a>(&self, user: &'a User) -> Cell<'a> {
        match self {
            Self::Id => Cell::Integer(user.model.id),
            Self::CreatedAt => Cell::Timestamp(Some(user.model.created_at)),
            Self::UpdatedAt => Cell::Timestamp(Some(user.model.updated_at)),
            Self::DeletedAt => Cell::Timestamp(user.model.deleted_at),
            Self::Name => Cell::Text(&user.name),
            Self::Age => Cell::Integer(user.age),
        }
    }
}

/// A filter resolved against the schema
struct Predicate<'f> {
    column: Column,
    filter: &'f FilterCondition,
}

impl<'f> Predicate<'f> {
    fn resolve(filter: &'f FilterCondition) -> RepositoryResult<Self> {
        let column = Column::parse(&filter.field, RepositoryOperation::FindAll)?;
        let compatible = matches!(
            (column, &filter.value),
            (Column::Id | Column::Age, FilterValue::Integer(_)) | (Column::Name, FilterValue::String(_))
        );
        if !compatible {
            return Err(RepositoryError::database_error(
                RepositoryOperation::FindAll,
                format!(
                    "operator does not exist for column \"{}\" and value {:?}",
                    filter.field, filter.value
                ),
            ));
        }
        Ok(Self { column, filter })
    }

    fn matches(&self, user: &User) -> bool {
        match (self.column.cell(user), &self.filter.value) {
            (Cell::Integer(actual), FilterValue::Integer(expected)) => actual == *expected,
            (Cell::Text(actual), FilterValue::String(expected)) => actual == expected.as_str(),
            _ => false,
        }
    }
}

impl Repository<UserId, User, CreateUser, UpdateUser> for MemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> RepositoryResult<Option<User>> {
        Ok(self.table.read().await.live(*id).cloned())
    }

    async fn find_all(
        &self,
        filters: &[FilterCondition],
        order_by: Option<(&str, OrderDirection)>,
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<User>> {
        let predicates = filters
            .iter()
            .map(Predicate::resolve)
            .collect::<RepositoryResult<Vec<_>>>()?;
        let order = order_by
            .map(|(column, direction)| {
                Column::parse(column, RepositoryOperation::FindAll).map(|c| (c, direction))
            })
            .transpose()?;

        let table = self.table.read().await;
        let mut rows: Vec<&User> = table
            .rows
            .iter()
            .filter(|u| !u.model.is_deleted())
            .filter(|u| predicates.iter().all(|p| p.matches(u)))
            .collect();

        rows.sort_by(|a, b| {
            let primary = match order {
                Some((column, OrderDirection::Ascending)) => column.cell(a).cmp(&column.cell(b)),
                Some((column, OrderDirection::Descending)) => column.cell(b).cmp(&column.cell(a)),
                None => Ordering::Equal,
            };
            primary.then_with(|| a.model.id.cmp(&b.model.id))
        });

        let (offset, limit) = match pagination {
            Some(page) => (
                usize::try_from(page.offset).unwrap_or(usize::MAX),
                usize::try_from(page.limit).unwrap_or(usize::MAX),
            ),
            None => (0, usize::MAX),
        };

        Ok(rows.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn create(&self, data: CreateUser) -> RepositoryResult<User> {
        let mut table = self.table.write().await;
        if table.name_taken(&data.name, None) {
            return Err(RepositoryError::already_exists(ENTITY, data.name));
        }

        table.last_id += 1;
        let user = User {
            model: Model::new(table.last_id, Utc::now()),
            name: data.name,
            age: data.age,
        };
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &UserId, data: UpdateUser) -> RepositoryResult<User> {
        let op = RepositoryOperation::Update;
        let mut table = self.table.write().await;
        if table.live(*id).is_none() {
            return Err(RepositoryError::not_found(ENTITY, id.to_string()).with_operation(op));
        }
        if let Some(ref name) = data.name {
            if table.name_taken(name, Some(*id)) {
                return Err(RepositoryError::already_exists(ENTITY, name.clone()).with_operation(op));
            }
        }

        let user = table
            .live_mut(*id)
            .ok_or_else(|| RepositoryError::not_found(ENTITY, id.to_string()).with_operation(op))?;
        data.apply_to(user);
        user.model.updated_at = Utc::now();
        Ok(user.clone())
    }
}

impl SoftDeleteRepository<UserId, User, CreateUser, UpdateUser> for MemoryUserRepository {
    async fn soft_delete(&self, id: &UserId) -> RepositoryResult<bool> {
        let mut table = self.table.write().await;
        match table.live_mut(*id) {
            Some(user) => {
                user.model.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl HealthCheck for MemoryUserRepository {
    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
