use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use linear_cut_optimizer::types::{deserialize_u32_from_number, deserialize_u32_vec_from_numbers};
use linear_cut_optimizer::{CostConfig, CutRequirement, InvoiceResult, OptimizeError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    cuts: Vec<CutRequirement>,
    #[serde(deserialize_with = "deserialize_u32_vec_from_numbers")]
    standard_lengths: Vec<u32>,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    kerf_width: u32,
    #[serde(default)]
    cost_config: Option<CostConfig>,
}

fn error_status(err: &OptimizeError) -> StatusCode {
    match err {
        OptimizeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        OptimizeError::NoFeasibleStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn optimize(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<InvoiceResult>, (StatusCode, Json<Value>)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );

    linear_cut_optimizer::optimize(
        &req.cuts,
        &req.standard_lengths,
        req.kerf_width,
        req.cost_config.as_ref(),
    )
    .map(Json)
    .map_err(|e| {
        tracing::warn!(error = %e, "optimize rejected");
        (error_status(&e), Json(json!({ "error": e.to_string() })))
    })
}

async fn up() -> &'static str {
    "ok"
}

fn app() -> Router {
    Router::new()
        .route("/up", get(up))
        .route("/optimize", post(optimize))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app()).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: Value) -> Json<OptimizeRequest> {
        Json(serde_json::from_value(body).unwrap())
    }

    #[tokio::test]
    async fn test_optimize_with_costs() {
        let body = json!({
            "cuts": [{"length": 1000, "quantity": 2}, {"length": 500, "quantity": 1}],
            "standard_lengths": [500, 1000, 1500, 3050.0],
            "kerf_width": 3,
            "cost_config": {"setup_fee_per_length": 3, "per_cut_fee": 2}
        });
        let Json(result) = optimize(request(body)).await.unwrap();
        assert_eq!(result.total_cuts, 3);
        let costs = result.costs.unwrap();
        assert_eq!(costs.total_cutting_costs, 6.0);
        assert_eq!(
            costs.total_setup_fees,
            3.0 * result.stock_usage.len() as f64
        );
    }

    #[tokio::test]
    async fn test_oversize_cut_is_unprocessable() {
        let body = json!({
            "cuts": [{"length": 4000, "quantity": 1}],
            "standard_lengths": [500, 1000, 1500, 3050]
        });
        let (status, Json(err)) = optimize(request(body)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err["error"].as_str().unwrap().contains("4000"));
    }

    #[tokio::test]
    async fn test_up() {
        assert_eq!(up().await, "ok");
    }

    #[tokio::test]
    async fn test_negative_fee_is_bad_request() {
        let body = json!({
            "cuts": [{"length": 400, "quantity": 1}],
            "standard_lengths": [500, 1000],
            "cost_config": {"setup_fee_per_length": 3, "per_cut_fee": -2}
        });
        let (status, Json(err)) = optimize(request(body)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].as_str().unwrap().contains("per-cut fee"));
    }

    #[tokio::test]
    async fn test_empty_catalogue_is_bad_request() {
        let body = json!({
            "cuts": [{"length": 400, "quantity": 1}],
            "standard_lengths": []
        });
        let (status, _) = optimize(request(body)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
