use dotenvy::dotenv;
use hallpass::config::database::run_migrations;
use hallpass::config::server::ServerConfig;
use hallpass::logging::LogFormat;
use hallpass::router::init_router;
use hallpass::state::init_app_state;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // axum logs rejections from built-in extractors with the `axum::rejection`
        // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
        format!(
            "{}=debug,tower_http=debug,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    let state = init_app_state().await;
    run_migrations(&state.db).await;

    let server_config = ServerConfig::from_env();
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr())
        .await
        .expect("Failed to bind listener");
    println!("🚀 Server running on http://{}", server_config.bind_addr());
    println!(
        "📚 Swagger UI available at http://{}/swagger-ui",
        server_config.bind_addr()
    );
    println!(
        "📖 Scalar UI available at http://{}/scalar",
        server_config.bind_addr()
    );
    axum::serve(listener, app).await.expect("Server error");
}
