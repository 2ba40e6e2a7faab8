use std::sync::Arc;

use advisor_core::CaseAnalysis;
use axum::extract::State;
use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub case: HealthCheck,
    pub checked_at: String,
}

/// Health reports on the same case the API answers from.
pub fn router(analysis: Arc<CaseAnalysis>) -> Router {
    Router::new().route("/health", get(health)).with_state(analysis)
}

pub async fn health(
    State(analysis): State<Arc<CaseAnalysis>>,
) -> (StatusCode, Json<HealthResponse>) {
    let case = case_check(&analysis);
    let ready = case.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "advisor-server runtime initialized".to_string(),
        },
        case,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn case_check(analysis: &CaseAnalysis) -> HealthCheck {
    match analysis.case.validate() {
        Ok(()) => HealthCheck {
            status: "ready",
            detail: format!("case `{}` validated", analysis.case.title),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use advisor_core::{CaseAnalysis, CaseData};
    use axum::extract::State;
    use axum::{http::StatusCode, Json};

    use crate::health::health;

    #[tokio::test]
    async fn health_returns_ready_for_valid_case() {
        let (status, Json(payload)) = health(State(Arc::new(CaseAnalysis::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.case.status, "ready");
        assert_eq!(payload.case.detail, "case `Grocery Distribution Automation` validated");
        assert_eq!(payload.service.status, "ready");
        assert!(!payload.checked_at.is_empty());
    }

    #[tokio::test]
    async fn health_is_degraded_for_the_served_invalid_case() {
        let analysis = CaseAnalysis::new(CaseData { stores: 0, ..CaseData::default() });

        let (status, Json(payload)) = health(State(Arc::new(analysis))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert!(payload.case.detail.contains("stores"));
    }
}
