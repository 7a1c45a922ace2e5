//! User collection handlers
//!
//! Handlers are generic over the store client so the same code serves the
//! PostgreSQL and in-memory backends.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::error::{ApiError, ApiOperation};
use super::query::ListUsersQuery;
use crate::models::{CreateUser, UpdateUser, User, UserId};
use crate::repository::{Repository, SoftDeleteRepository, UserRepository};
use crate::state::AppState;

const ENTITY: &str = "User";

/// Resolve a path segment to a user id
///
/// A segment that is not an integer cannot name a stored user, so it is
/// reported the same way as a missing one.
fn parse_id(raw: &str, operation: ApiOperation) -> Result<UserId, ApiError> {
    raw.trim()
        .parse::<UserId>()
        .map_err(|_| ApiError::not_found(ENTITY, raw).with_operation(operation))
}

fn rejected(operation: ApiOperation, rejection: JsonRejection) -> ApiError {
    ApiError::bad_request(operation, rejection.body_text())
}

/// `GET /users`
///
/// The query string is read as raw pairs so that no parameter, repeated or
/// malformed, can turn into a client error.
pub async fn list_users<R: UserRepository>(
    State(state): State<AppState<R>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let query: ListUsersQuery = pairs.into_iter().collect();
    let filters = query.filters();
    let (column, direction) = query.order_by();
    let pagination = query.pagination();

    let users = state
        .users()
        .find_all(&filters, Some((column.as_str(), direction)), Some(pagination))
        .await?;

    tracing::debug!(
        count = users.len(),
        sort = %column,
        direction = %direction,
        offset = pagination.offset,
        limit = pagination.limit,
        "listed users"
    );
    Ok(Json(users))
}

/// `POST /users`
pub async fn create_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<CreateUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(data) = payload.map_err(|r| rejected(ApiOperation::Create, r))?;
    data.validate()
        .map_err(|msg| ApiError::validation_failed(ApiOperation::Create, msg))?;

    let user = state.users().create(data).await?;
    tracing::info!(user_id = user.id(), "created user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/{id}`
///
/// The user must exist before the body is looked at: an unknown id is a
/// 404 even when the payload is malformed.
pub async fn update_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let operation = ApiOperation::Update;
    let id = parse_id(&raw_id, operation)?;

    if state.users().find_by_id(&id).await?.is_none() {
        return Err(ApiError::not_found(ENTITY, id.to_string()).with_operation(operation));
    }

    let Json(patch) = payload.map_err(|r| rejected(operation, r))?;
    patch
        .validate()
        .map_err(|msg| ApiError::validation_failed(operation, msg))?;

    let user = state.users().update(&id, patch).await?;
    tracing::info!(user_id = id, "updated user");
    Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete_user<R: UserRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let operation = ApiOperation::Delete;
    let id = parse_id(&raw_id, operation)?;

    if !state.users().soft_delete(&id).await? {
        return Err(ApiError::not_found(ENTITY, id.to_string()).with_operation(operation));
    }

    tracing::info!(user_id = id, "soft-deleted user");
    Ok(StatusCode::NO_CONTENT)
}
