use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::registry::ConnectionRegistry;
use crate::signaling::{MembershipCoordinator, RelayRouter};
use crate::websockets::ConnectionManager;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn ConnectionRegistry>,
    pub connection_manager: Arc<dyn ConnectionManager>,
    pub coordinator: Arc<MembershipCoordinator>,
    pub relay: Arc<RelayRouter>,
}

impl AppState {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        connection_manager: Arc<dyn ConnectionManager>,
        coordinator: Arc<MembershipCoordinator>,
        relay: Arc<RelayRouter>,
    ) -> Self {
        Self {
            registry,
            connection_manager,
            coordinator,
            relay,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Duplicate connection: {0}")]
    DuplicateConnection(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DuplicateConnection(id) => (
                StatusCode::CONFLICT,
                format!("Connection {} is already registered", id),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
