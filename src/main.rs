use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use inkwell_backend::{
    config::Config,
    db::{postgres_user_repository::PostgresUserRepository, user_repository::UserRepository},
    responses::JsonResponse,
    routes::{auth_routes, user_routes},
    services::smtp_mailer::{Mailer, SmtpMailer},
    state::AppState,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[cfg(feature = "tls")]
use axum_server::tls_rustls::RustlsConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;

    let rate_limit_auth_s: u64 = std::env::var("RATE_LIMITER_AUTH_SECONDS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);
    let rate_limit_auth_burst: u32 = std::env::var("RATE_LIMITER_AUTH_BURST")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(10);
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(rate_limit_auth_s)
            .burst_size(rate_limit_auth_burst)
            .use_headers()
            .error_handler(|_err| {
                JsonResponse::too_many_requests(
                    "Too many requests. Please wait a moment and try again.",
                )
                .into_response()
            })
            .finish()
            .context("invalid rate limiter settings")?,
    );

    let governor_limiter = auth_governor_conf.limiter().clone();
    std::thread::spawn(move || {
        let interval = std::time::Duration::from_secs(60);
        loop {
            std::thread::sleep(interval);
            governor_limiter.retain_recent();
        }
    });

    let pg_pool = establish_connection(&config.database_url).await?;
    sqlx::migrate!("./migrations")
        .run(&pg_pool)
        .await
        .context("failed to run database migrations")?;

    let user_repo = Arc::new(PostgresUserRepository { pool: pg_pool }) as Arc<dyn UserRepository>;
    let mailer = Arc::new(
        SmtpMailer::new(&config.frontend_origin).context("failed to initialize mailer")?,
    ) as Arc<dyn Mailer>;

    let addr: SocketAddr = format!("{}:{}", config.app_host, config.app_port)
        .parse()
        .context("APP_HOST/APP_PORT do not form a socket address")?;

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let state = AppState::new(user_repo, mailer, &config)?;

    let app = Router::new()
        .route("/", get(root))
        .nest(
            "/auth",
            auth_routes().layer(GovernorLayer {
                config: auth_governor_conf,
            }),
        )
        .nest("/users", user_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    serve(app, addr).await
}

#[cfg(not(feature = "tls"))]
async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Running without TLS at http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

#[cfg(feature = "tls")]
async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let tls_config = RustlsConfig::from_pem_file(
        std::env::var("DEV_CERT_LOCATION").context("DEV_CERT_LOCATION must be set")?,
        std::env::var("DEV_KEY_LOCATION").context("DEV_KEY_LOCATION must be set")?,
    )
    .await
    .context("failed to load TLS certs")?;

    info!("Running with TLS at https://{}", addr);
    axum_server::bind_rustls(addr, tls_config)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;
    Ok(())
}

async fn root() -> Response {
    JsonResponse::success("Hello, Inkwell!").into_response()
}

/// Establish a connection to the database and verify it.
async fn establish_connection(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to the database")?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("failed to verify database connection")?;

    info!("Successfully connected to the database");
    Ok(pool)
}
