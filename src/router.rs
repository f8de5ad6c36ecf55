use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_app, metrics_middleware};
use crate::middleware::gate::access_gate;
use crate::modules::departments::router::init_departments_router;
use crate::modules::roles::router::{init_role_switch_router, init_roles_router};
use crate::modules::sections::router::init_sections_router;
use crate::modules::staff::router::init_staff_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;
use axum::extract::State;
use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde_json::json;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match tokio::time::timeout(
        Duration::from_secs(1),
        sqlx::query("SELECT 1").execute(&state.db),
    )
    .await
    {
        Ok(Ok(_)) => "reachable",
        _ => "unreachable",
    };

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}

pub fn init_router(state: AppState) -> Router {
    // Everything nested here requires an allow from the access gate. The
    // switch endpoint stays outside: it is authenticated by its handler
    // but must work for callers whose active role has no permissions yet.
    let protected = Router::new()
        .nest("/roles", init_roles_router())
        .nest("/students", init_students_router())
        .nest("/staff", init_staff_router())
        .nest("/departments", init_departments_router())
        .nest("/sections", init_sections_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), access_gate));

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", init_role_switch_router().merge(protected))
        .with_state(state.clone());

    if let Some(handle) = state.metrics_handle.clone() {
        router = router.merge(metrics_app(handle));
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(state.cors_config.origins())
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
