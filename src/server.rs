use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::average::WeightedTotals;
use crate::config::Config;
use crate::planner::{OptimizationReport, PlanRequest, Planner};
use crate::validation::{validate_pairs, ValidationError};

#[derive(Clone)]
struct ApiState {
    planner: Planner,
    config: Config,
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
struct AverageRequest {
    /// `[grade, credit_weight]` pairs.
    #[serde(default)]
    items: Vec<(f64, f64)>,
}

#[derive(Debug, Serialize)]
struct AverageResponse {
    average: f64,
    credit_weight: f64,
}

pub async fn run_server(config: Config, bind: SocketAddr) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(config).layer(cors);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(config: Config) -> Router {
    let state = ApiState {
        planner: config.planner(),
        config,
    };
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/config", get(show_config))
        .route("/api/plan", post(plan))
        .route("/api/average", post(average))
        .with_state(state)
}

async fn index() -> &'static str {
    "Binary Pass planner API"
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn show_config(State(state): State<ApiState>) -> Json<ApiResponse<Config>> {
    ok(state.config)
}

async fn plan(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<OptimizationReport> {
    let Json(request) = payload?;
    let report = state.planner.plan(&request).map_err(|err| {
        warn!("rejected plan request: {err}");
        ApiError::from(err)
    })?;
    Ok(ok(report))
}

async fn average(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<AverageRequest>, JsonRejection>,
) -> ApiResult<AverageResponse> {
    let Json(request) = payload?;
    validate_pairs(&request.items, state.planner.bounds)?;
    let totals = WeightedTotals::accumulate(&request.items);
    Ok(ok(AverageResponse {
        average: totals.average(),
        credit_weight: totals.credit_weight,
    }))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::{FromRequest, State};
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;
    use axum::Json;

    use super::{average, plan, ApiError, ApiState, AverageRequest};
    use crate::config::Config;
    use crate::planner::PlanRequest;
    use crate::types::GradedItem;

    fn state() -> ApiState {
        let config = Config::default();
        ApiState {
            planner: config.planner(),
            config,
        }
    }

    #[tokio::test]
    async fn plan_endpoint_returns_report() {
        let request = PlanRequest {
            past_aggregates: Vec::new(),
            current_items: vec![
                GradedItem::new("X", 10.0, 60.0),
                GradedItem::new("Y", 10.0, 95.0),
                GradedItem::new("Z", 10.0, 58.0),
            ],
            passes_available: 2,
            pass_threshold: None,
        };
        let Json(response) = plan(State(state()), Ok(Json(request)))
            .await
            .expect("plan rejected");
        assert!(response.ok);
        assert_eq!(response.data.chosen_identifiers, vec!["Z", "X"]);
        assert_eq!(response.data.optimized_average, 95.0);
    }

    #[tokio::test]
    async fn plan_endpoint_rejects_invalid_input() {
        let request = PlanRequest {
            passes_available: -1,
            ..PlanRequest::default()
        };
        let err = plan(State(state()), Ok(Json(request)))
            .await
            .expect_err("negative pass count accepted");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn average_endpoint_weights_pairs() {
        let request = AverageRequest {
            items: vec![(90.0, 3.0), (70.0, 1.0)],
        };
        let Json(response) =
            tokio_test::block_on(average(State(state()), Ok(Json(request))))
                .expect("average rejected");
        assert_eq!(response.data.average, 85.0);
        assert_eq!(response.data.credit_weight, 4.0);
    }

    #[tokio::test]
    async fn average_endpoint_rejects_out_of_range_grades() {
        let request = AverageRequest {
            items: vec![(150.0, 1.0), (-20.0, 1.0)],
        };
        let err = average(State(state()), Ok(Json(request)))
            .await
            .expect_err("out-of-range grade accepted");
        assert_eq!(err.message, "pair #0 has grade 150 outside [0, 100]");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/plan")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"current_items\": ["))
            .expect("request build failed");
        let rejection = Json::<super::PlanRequest>::from_request(request, &())
            .await
            .expect_err("malformed body accepted");

        let response = ApiError::from(rejection).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body read failed");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("body is not JSON");
        assert_eq!(json["ok"], false);
        assert!(json["error"].is_string());
    }
}
