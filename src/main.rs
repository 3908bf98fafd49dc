// SPDX-License-Identifier: MIT

//! Fitspector API Server
//!
//! Links RunKeeper accounts to internal users and imports their workout
//! history into Firestore in the background.

use fitspector::{
    config::Config,
    db::{FirestoreDb, WorkoutStore},
    services::{
        runkeeper::RemoteActivityApi, IdentityResolver, RunKeeperClient, WorkoutImporter,
    },
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment; missing credentials fail here.
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Fitspector API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize RunKeeper client
    let runkeeper = RunKeeperClient::new(
        config.runkeeper_client_id.clone(),
        config.runkeeper_client_secret.clone(),
    );

    // Wire the import pipeline behind the store/client seams
    let store: Arc<dyn WorkoutStore> = Arc::new(db.clone());
    let remote: Arc<dyn RemoteActivityApi> = Arc::new(runkeeper.clone());

    let importer = WorkoutImporter::new(Arc::clone(&store), Arc::clone(&remote));
    let resolver = IdentityResolver::new(store, remote, importer);

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        runkeeper,
        resolver,
    });

    // Build router
    let app = fitspector::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitspector=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
