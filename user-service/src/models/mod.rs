//! Persisted entities

mod user;

pub use user::{CreateUser, Model, UpdateUser, User, UserId};
