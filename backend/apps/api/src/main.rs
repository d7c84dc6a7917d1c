//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::{AccountConfig, PgAccountRepository, account_router};
use anyhow::Context;
use axum::{
    Router, http,
    http::{Method, header},
};
use booking::{
    BookingConfig, FlutterwaveConfig, FlutterwaveGateway, PgBookingRepository, booking_router,
};
use platform::image_host::{CloudinaryConfig, CloudinaryHost};
use platform::mailer::{HttpMailer, MailerConfig};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5223";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "foodmed_api=info,accounts=info,booking=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url =
        env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Outbound HTTP client shared by mailer, image host and gateway
    let timeout_secs = env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    // Account configuration
    let account_config = match optional_env("PASSWORD_PEPPER") {
        Some(pepper_b64) => {
            let pepper = platform::crypto::from_base64(&pepper_b64)
                .context("PASSWORD_PEPPER must be valid base64")?;
            AccountConfig::with_pepper(pepper)
        }
        None => {
            if !cfg!(debug_assertions) {
                tracing::warn!("PASSWORD_PEPPER not set, hashing without pepper");
            }
            AccountConfig::default()
        }
    };

    // Booking configuration
    let defaults = if cfg!(debug_assertions) {
        BookingConfig::development()
    } else {
        BookingConfig::default()
    };
    let booking_config = BookingConfig {
        frontend_url: optional_env("FRONTEND_URL").unwrap_or(defaults.frontend_url.clone()),
        public_base_url: optional_env("PUBLIC_BASE_URL")
            .unwrap_or(defaults.public_base_url.clone()),
        currency: optional_env("PAYMENT_CURRENCY").unwrap_or(defaults.currency.clone()),
        ..defaults
    };

    // External collaborators
    let mail_defaults = MailerConfig::default();
    let mailer = HttpMailer::new(
        http_client.clone(),
        MailerConfig {
            api_url: optional_env("MAIL_API_URL").unwrap_or(mail_defaults.api_url),
            api_key: optional_env("MAIL_API_KEY"),
            from: optional_env("MAIL_FROM").unwrap_or(mail_defaults.from),
        },
    );
    if mailer.is_dry_run() {
        tracing::warn!("MAIL_API_KEY not set, outgoing email is logged only");
    }

    let cloudinary_defaults = CloudinaryConfig::default();
    let images = CloudinaryHost::new(
        http_client.clone(),
        CloudinaryConfig {
            cloud_name: optional_env("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            upload_preset: optional_env("CLOUDINARY_UPLOAD_PRESET")
                .unwrap_or(cloudinary_defaults.upload_preset.clone()),
            ..cloudinary_defaults
        },
    );

    let flutterwave_defaults = FlutterwaveConfig::default();
    let gateway = FlutterwaveGateway::new(
        http_client,
        FlutterwaveConfig {
            base_url: optional_env("FLW_BASE_URL").unwrap_or(flutterwave_defaults.base_url),
            secret_key: optional_env("FLW_SECRET_KEY"),
        },
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = Router::new()
        .merge(account_router(
            PgAccountRepository::new(pool.clone()),
            mailer.clone(),
            images,
            account_config,
        ))
        .merge(booking_router(
            PgBookingRepository::new(pool),
            gateway,
            mailer,
            booking_config,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("Invalid BIND_ADDR: {bind_addr}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Non-empty environment variable
fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
