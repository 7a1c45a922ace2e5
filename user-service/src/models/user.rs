//! User entity and request payloads
//!
//! A [`User`] is composed of the shared [`Model`] base record (identifier and
//! lifecycle timestamps) plus the two externally settable fields, `name` and
//! `age`. The base record is flattened when serialized, so clients see a
//! single flat JSON object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Store-assigned user identifier
pub type UserId = i64;

/// Base record shared by persisted entities
///
/// `deleted_at` is the soft-delete marker: rows with a value set are
/// excluded from every standard read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Model {
    /// Identifier assigned on insert, immutable afterwards
    pub id: UserId,
    /// Insert time
    pub created_at: DateTime<Utc>,
    /// Time of the last write
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Build a fresh base record stamped with `now`
    pub fn new(id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether the record has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A persisted user
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use user_service::models::{Model, User};
///
/// let user = User {
///     model: Model::new(1, Utc::now()),
///     name: "Alice".to_string(),
///     age: 30,
/// };
/// let json = serde_json::to_value(&user).unwrap();
/// assert_eq!(json["id"], 1);
/// assert_eq!(json["name"], "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub model: Model,
    /// Display name, unique among live users
    pub name: String,
    /// Age in years, zero when unknown
    pub age: i64,
}

impl User {
    pub fn id(&self) -> UserId {
        self.model.id
    }
}

/// Payload accepted by the create endpoint
///
/// Identifier and timestamps present in the incoming JSON are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    #[serde(default)]
    pub age: i64,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Check the entity invariants that the store does not enforce
    pub fn validate(&self) -> Result<(), String> {
        validate_name(&self.name)
    }
}

/// Partial update applied onto an existing user
///
/// Only the fields present in the payload are written; absent (or `null`)
/// fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

impl UpdateUser {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.name {
            Some(ref name) => validate_name(name),
            None => Ok(()),
        }
    }

    /// Merge the patch into a loaded user
    pub fn apply_to(&self, user: &mut User) {
        if let Some(ref name) = self.name {
            user.name.clone_from(name);
        }
        if let Some(age) = self.age {
            user.age = age;
        }
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name must not be empty".to_string());
    }
    Ok(())
}
