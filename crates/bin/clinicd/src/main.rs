//! # clinicd: clinic booking daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository, credential, and payment adapters
//! - Build the axum router over the application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on every adapter crate.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use clinic_adapter_http_axum::state::{Adapters, AppState, Ports};
use clinic_adapter_payment_stripe::{StripeClient, StripeConfig};
use clinic_adapter_storage_sqlite_sqlx::{
    SqliteOrderRepository, SqlitePaymentLedger, SqliteReviewRepository, SqliteServiceRepository,
    SqliteUserRepository,
};
use clinic_adapter_token_jwt::JwtTokenCodec;

use crate::config::{Config, LoggingConfig};

/// Production adapter set: `SQLite` storage, JWT credentials, Stripe payments.
struct Production;

impl Adapters for Production {
    type Services = SqliteServiceRepository;
    type Orders = SqliteOrderRepository;
    type Users = SqliteUserRepository;
    type Reviews = SqliteReviewRepository;
    type Ledger = SqlitePaymentLedger;
    type Processor = StripeClient;
    type Tokens = JwtTokenCodec;
}

fn init_tracing(logging: &LoggingConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_new(&logging.filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json_layer = logging
        .json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!logging.json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging);
    let bind_addr = config.bind_addr();

    // Database
    let db = clinic_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Payments
    if !config.has_stripe_key() {
        tracing::warn!("no Stripe secret key configured; payment intents will be rejected");
    }
    let timeout = config.payment.timeout();
    let stripe = StripeClient::new(StripeConfig {
        secret_key: config.payment.stripe_secret_key,
        api_base: config.payment.api_base,
        timeout,
    })
    .context("failed to build Stripe client")?;

    // HTTP
    let ports = Ports::<Production> {
        services: SqliteServiceRepository::new(pool.clone()),
        orders: SqliteOrderRepository::new(pool.clone()),
        users: SqliteUserRepository::new(pool.clone()),
        reviews: SqliteReviewRepository::new(pool.clone()),
        ledger: SqlitePaymentLedger::new(pool),
        processor: stripe,
        tokens: JwtTokenCodec::new(&config.auth.token_secret),
    };
    let state = AppState::new(ports, config.payment.currency.to_ascii_lowercase());
    let app = clinic_adapter_http_axum::router::build(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(address = %bind_addr, "clinicd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("clinicd stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, starting graceful shutdown");
}
