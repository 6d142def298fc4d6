use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

mod env_utils;
mod route_handlers;
mod storage;
mod tunnel;

pub struct AppState {
    store: storage::WebhookStore,
}
type SharedAppState = Arc<Mutex<AppState>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Hookiro v{}", env!("CARGO_PKG_VERSION"));
    debug!("initializing webhook storage ...");

    let store = storage::WebhookStore::new(env_utils::get_storage_dir());
    store
        .init()
        .context("error while initializing webhook storage")?;

    let port = env_utils::get_port();
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let state: SharedAppState = Arc::new(Mutex::new(AppState { store }));

    tokio::spawn(announce_endpoints(port));

    axum::Server::bind(&addr)
        .serve(get_main_router().with_state(state).into_make_service())
        .await
        .context("error while starting API server")?;

    anyhow::Ok(())
}

/**
 * main router for the app: the HTML viewer, the capture endpoint, and the
 * history API, with a JSON 404 for everything else
 **/
fn get_main_router() -> Router<SharedAppState> {
    debug!("initializing router(s) ...");

    // a wrong method on a known path gets the same JSON 404 as an unknown
    // path, so every miss has the one error shape
    Router::new()
        .route(
            "/",
            get(route_handlers::home::handler).fallback(route_handlers::not_found::handler),
        )
        .route(
            "/webhook",
            post(route_handlers::webhooks::handler).fallback(route_handlers::not_found::handler),
        )
        .route(
            "/api/webhooks",
            get(route_handlers::webhook_list::handler)
                .fallback(route_handlers::not_found::handler),
        )
        .fallback(route_handlers::not_found::handler)
}

/**
 * resolve the public tunnel URL (if the ngrok agent is up) and log where
 * webhooks can be sent
 **/
async fn announce_endpoints(port: u16) {
    let local_uri = env_utils::get_host_uri(Some(port));

    match tunnel::get_public_url(port).await {
        Some(public_url) => {
            info!("Dashboard:        {} (local: {})", public_url, local_uri);
            info!(
                "Webhook endpoint: {}/webhook (local: {}/webhook)",
                public_url, local_uri
            );
        }
        None => {
            info!("Dashboard:        {}", local_uri);
            info!("Webhook endpoint: {}/webhook", local_uri);
        }
    }

    info!("Listening for webhooks ... (Press Ctrl+C to stop)");
}
