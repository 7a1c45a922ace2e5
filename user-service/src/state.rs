//! Application state shared across handlers

use std::sync::Arc;

use crate::config::Config;
use crate::repository::UserRepository;

/// Application state shared across handlers
///
/// Built once at startup and handed to the router; cloning only bumps
/// reference counts.
#[derive(Debug, Clone)]
pub struct AppState<R> {
    config: Arc<Config>,
    users: R,
}

impl<R: UserRepository> AppState<R> {
    pub fn new(config: Config, users: R) -> Self {
        Self {
            config: Arc::new(config),
            users,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the user store client
    pub fn users(&self) -> &R {
        &self.users
    }
}
