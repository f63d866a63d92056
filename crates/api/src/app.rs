use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    account_state::account_state, account_status::account_status,
    create_withdrawal::create_withdrawal, current_loan::current_loan, health::health_check,
    loan_config::{get_loan_config, update_loan_config},
    loan_schedule::loan_schedule, loan_status::loan_status, payment_method::payment_method,
    save_payment_method::save_payment_method, staff_loan_status::staff_loan_status,
    staff_loans::staff_loans, staff_update_account::staff_update_account,
    staff_update_loan::staff_update_loan,
    staff_update_payment_method::staff_update_payment_method,
    staff_update_withdrawal::staff_update_withdrawal, staff_withdrawals::staff_withdrawals,
    submit_loan::submit_loan, verify_otp::verify_otp, withdrawal_history::withdrawal_history,
    withdrawal_status::withdrawal_status,
};
use axum::routing::{get, post};
use axum::{middleware, response::IntoResponse, Router};
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::PrometheusMetricLayer;
use loanline_core::app_state::AppState;
use loanline_core::security::SecurityConfig;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Identity images and a signature travel in one multipart body.
const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

pub fn create_router(
    state: Arc<AppState>,
    metric_layer: PrometheusMetricLayer<'static>,
    metric_handle: PrometheusHandle,
) -> Router {
    let public_router = create_public_routers(metric_handle);
    let customer_router = create_customer_routers(&state);
    let staff_router = create_staff_routers(&state);

    let mut router = Router::new()
        .merge(public_router)
        .merge(customer_router)
        .merge(staff_router)
        .layer(axum::extract::DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(https_redirect_middleware))
        .layer(metric_layer)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http()),
        );

    // the governor key extractor needs the peer address, which test clients don't provide
    if std::env::var("APP_ENV").unwrap_or_default() != "test" {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish();

        match governor_conf {
            Some(conf) => router = router.layer(GovernorLayer::new(Arc::new(conf))),
            None => tracing::warn!("Rate limiting disabled: invalid governor configuration"),
        }
    }

    router.with_state(state)
}

fn create_customer_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/loans", post(submit_loan))
        .route("/api/loans/current", get(current_loan))
        .route("/api/loans/status", get(loan_status))
        .route("/api/loans/schedule", get(loan_schedule))
        .route("/api/withdrawals", post(create_withdrawal))
        .route("/api/withdrawals/verify_otp", post(verify_otp))
        .route("/api/withdrawals/status", get(withdrawal_status))
        .route("/api/withdrawals/history", get(withdrawal_history))
        .route("/api/account/state", get(account_state))
        .route("/api/account/status", get(account_status))
        .route(
            "/api/payment_method",
            get(payment_method).post(save_payment_method),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_staff_routers(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/staff/loans", get(staff_loans))
        .route("/api/staff/loans/{loan_id}", post(staff_update_loan))
        .route("/api/staff/loans/{loan_id}/status", post(staff_loan_status))
        .route("/api/staff/withdrawals", get(staff_withdrawals))
        .route(
            "/api/staff/withdrawals/{withdrawal_id}",
            post(staff_update_withdrawal),
        )
        .route(
            "/api/staff/accounts/{account_id}",
            post(staff_update_account),
        )
        .route(
            "/api/staff/payment_methods/{account_id}",
            post(staff_update_payment_method),
        )
        .route(
            "/api/staff/loan_config",
            get(get_loan_config).put(update_loan_config),
        )
        .layer(middleware::from_fn(SecurityConfig::require_staff))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            SecurityConfig::auth_middleware,
        ))
}

fn create_public_routers(metric_handle: PrometheusHandle) -> Router<Arc<AppState>> {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health_check))
        .route(
            "/metrics",
            get(move || std::future::ready(metric_handle.render())),
        )
}

async fn https_redirect_middleware(
    req: axum::extract::Request,
    next: middleware::Next,
) -> Result<axum::response::Response, (axum::http::StatusCode, String)> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

    if env == "production" {
        let headers = req.headers();
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok());

        if let Some("http") = proto {
            let host = headers
                .get("host")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("localhost");

            let path_and_query = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("");
            let redirect_url = format!("https://{}{}", host, path_and_query);

            return Ok(axum::response::Redirect::permanent(&redirect_url).into_response());
        }
    }

    Ok(next.run(req).await)
}
