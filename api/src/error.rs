use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cryptoview_rs::DashboardError;
use serde_json::json;
use tracing::{error, warn};

use crate::gate::GateError;

/// Failure of a dashboard request, rendered as `{ "error", "kind" }`.
#[derive(Debug)]
pub enum ApiError {
    Dashboard(DashboardError),
    Superseded,
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Dashboard(e) => match e {
                DashboardError::InvalidSelection(_) => StatusCode::BAD_REQUEST,
                DashboardError::SymbolNotFound { .. } => StatusCode::NOT_FOUND,
                DashboardError::RateLimited { .. } => StatusCode::SERVICE_UNAVAILABLE,
                DashboardError::Network(_) | DashboardError::Api { .. } | DashboardError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
                DashboardError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Superseded => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Dashboard(e) => e.kind(),
            Self::Superseded => "superseded",
            Self::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard(e) => write!(f, "{}", e),
            Self::Superseded => write!(f, "superseded by a newer selection"),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else if status != StatusCode::CONFLICT {
            warn!("{}", self);
        }

        let body = json!({ "error": self.to_string(), "kind": self.kind() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        Self::Dashboard(e)
    }
}

impl From<GateError> for ApiError {
    fn from(e: GateError) -> Self {
        match e {
            GateError::Superseded => Self::Superseded,
            GateError::Failed(msg) => Self::Internal(msg),
        }
    }
}

impl From<askama::Error> for ApiError {
    fn from(e: askama::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
