//! PetWatch Server: geofenced lost-and-found pet alerts
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use petwatch_core::config::AppConfig;
use petwatch_core::error::AppError;
use petwatch_core::traits::{Clock, SystemClock};
use petwatch_database::DatabasePool;
use petwatch_service::{
    CommentService, NotificationService, Notifier, PushSubscriptionService, SightingService,
    UserProfileService, ZoneMatcher, ZoneService,
};
use petwatch_worker::jobs::{JobCleanupHandler, PushDeliveryJobHandler, SightingMatchJobHandler};
use petwatch_worker::{CronScheduler, JobExecutor, JobQueue, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PETWATCH_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PetWatch v{}", env!("CARGO_PKG_VERSION"));
    let started_at = Instant::now();

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        tracing::info!("Running database migrations...");
        petwatch_database::migration::run_migrations(db.pool()).await?;
        tracing::info!("Database migrations complete");
    }

    // ── Step 2: Repositories and clock ───────────────────────────
    let repos = db.repositories();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // ── Step 3: Auth and push transport ──────────────────────────
    let jwt_decoder = Arc::new(petwatch_auth::JwtDecoder::new(&config.auth));
    let transport = petwatch_push::build_transport(&config.push)
        .map_err(|e| AppError::configuration(format!("Push transport init failed: {e}")))?;
    tracing::info!(enabled = config.push.enabled, "Push transport ready");

    // ── Step 4: Initialize services ──────────────────────────────
    let max_attempts = config.worker.max_attempts;
    let sighting_service = Arc::new(SightingService::new(
        repos.sightings.clone(),
        Arc::clone(&clock),
        config.ingest.clone(),
        max_attempts,
    ));
    let zone_service = Arc::new(ZoneService::new(repos.zones.clone(), Arc::clone(&clock)));
    let notification_service = Arc::new(NotificationService::new(
        repos.notifications.clone(),
        Arc::clone(&clock),
    ));
    let push_service = Arc::new(PushSubscriptionService::new(
        repos.push_subscriptions.clone(),
        Arc::clone(&clock),
    ));
    let comment_service = Arc::new(CommentService::new(
        repos.comments.clone(),
        repos.sightings.clone(),
        Arc::clone(&clock),
    ));
    let user_service = Arc::new(UserProfileService::new(
        repos.profiles.clone(),
        Arc::clone(&clock),
    ));
    let notifier = Notifier::new(
        repos.notifications.clone(),
        repos.push_subscriptions.clone(),
        repos.jobs.clone(),
        transport,
        Arc::clone(&clock),
        config.notifications.clone(),
        max_attempts,
    );

    // ── Step 5: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 6: Start background worker ──────────────────────────
    let mut scheduler = None;
    let worker_handle = if config.worker.enabled {
        tracing::info!("Starting background worker...");

        let worker_id = format!("worker-{}", &uuid::Uuid::new_v4().to_string()[..8]);
        let job_queue = Arc::new(JobQueue::new(
            repos.jobs.clone(),
            Arc::clone(&clock),
            worker_id,
            config.worker.clone(),
        ));

        let mut job_executor = JobExecutor::new();
        job_executor.register(Arc::new(SightingMatchJobHandler::new(
            repos.sightings.clone(),
            ZoneMatcher::new(repos.zones.clone()),
            notifier.clone(),
            Arc::clone(&clock),
        )));
        job_executor.register(Arc::new(PushDeliveryJobHandler::new(notifier)));
        job_executor.register(Arc::new(JobCleanupHandler::new(
            repos.jobs.clone(),
            Arc::clone(&clock),
            &config.worker,
        )));

        let worker_runner = WorkerRunner::new(
            Arc::clone(&job_queue),
            Arc::new(job_executor),
            config.worker.clone(),
        );

        let cron = CronScheduler::new(Arc::clone(&job_queue)).await?;
        cron.register_default_tasks(&config.worker).await?;
        cron.start().await?;
        scheduler = Some(cron);

        let worker_cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            worker_runner.run(worker_cancel).await;
        });

        tracing::info!("Background worker started");
        Some(handle)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let app_state = petwatch_api::AppState {
        config: Arc::new(config.clone()),
        clock: Arc::clone(&clock),
        jwt_decoder,
        sighting_service,
        comment_service,
        user_service,
        zone_service,
        notification_service,
        push_service,
        started_at,
    };

    let app = petwatch_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("PetWatch server listening on {addr}");

    // ── Step 8: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 9: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");

    if let Some(mut cron) = scheduler
        && let Err(e) = cron.shutdown().await
    {
        tracing::warn!("Scheduler shutdown failed: {e}");
    }

    if let Some(handle) = worker_handle {
        let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Worker did not stop within {}s", grace.as_secs());
        }
    }

    db.close().await;
    tracing::info!("PetWatch server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
