//! Zero-Proof Bar storefront binary.
//!
//! Serves the public site on port 3000: server-rendered askama pages with
//! HTMX fragments, backed by the commerce REST API for catalog and carts,
//! Klaviyo for newsletter signups, and a markdown pipeline for the blog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zeroproof_storefront::{
    build_router, config::StorefrontConfig, content::ContentStore, state::AppState,
};

/// Default log directives when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "zeroproof_storefront=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let config = StorefrontConfig::from_env().expect("invalid configuration");

    // Keep the guard alive for the life of the process; dropping it flushes
    // and shuts down the Sentry client.
    let _sentry_guard = init_telemetry(&config);

    let content = ContentStore::load(Path::new("crates/storefront/content"))
        .expect("blog content failed to load");
    let state =
        AppState::new(config.clone(), content).expect("application state failed to initialize");

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("could not bind listen address");
    tracing::info!("storefront listening on {addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server exited with error");
}

/// Set up Sentry (when a DSN is configured) and the tracing subscriber.
///
/// Sentry comes first so its tracing layer sees an initialized client. WARN
/// and ERROR events become Sentry events; INFO and DEBUG become breadcrumbs.
fn init_telemetry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config
                    .sentry_environment
                    .clone()
                    .map(std::borrow::Cow::Owned),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
                tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
                tracing::Level::INFO | tracing::Level::DEBUG => {
                    sentry_tracing::EventFilter::Breadcrumb
                }
                _ => sentry_tracing::EventFilter::Ignore,
            }),
        )
        .init();

    if guard.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }
    guard
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("ctrl_c handler failed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler failed")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
    tracing::info!("Shutting down");
}
