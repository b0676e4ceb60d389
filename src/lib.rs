// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training journal: log workouts, plan strength sessions, and expand weekly
//! routines into plans.
//!
//! This crate provides the backend API. Every user's data lives in a
//! sorted-set store under keys namespaced by username.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod validation;

use std::sync::Arc;

use config::Config;
use db::{Journal, SortedStore};
use middleware::AuthUser;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn SortedStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn SortedStore>) -> Self {
        Self { config, store }
    }

    /// Repository scoped to `user`.
    pub fn journal(&self, user: &AuthUser) -> Journal {
        Journal::new(self.store.clone(), user.username.clone())
    }
}
