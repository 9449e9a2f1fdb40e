//! Folio - A small content and contact backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    api::{self, AppState},
    config::Config,
    db::{self, repositories::SqlxContactRepository},
    mail::EmailService,
    queue::{self, EmailJobHandler, JobOptions, QueueService, QueueWorker, SEND_EMAIL_JOB},
    recaptcha::RecaptchaService,
    services::{ContactNotifier, ContactService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio...");

    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Queue and email delivery
    let job_queue = queue::create_queue(&config.queue).await?;
    let queue_service = Arc::new(QueueService::new(
        job_queue.clone(),
        JobOptions::from(&config.queue),
    ));
    let email_service = Arc::new(EmailService::from_config(&config.mail)?);
    tracing::info!("Queue initialized: {:?}", config.queue.driver);

    // Contact service
    let recaptcha = Arc::new(RecaptchaService::new(&config.recaptcha)?);
    let mut contact_service = ContactService::new(SqlxContactRepository::boxed(pool.clone()))
        .with_recaptcha(recaptcha);
    match config.mail.contact_email.clone() {
        Some(recipient) => {
            tracing::info!("Contact notifications go to {}", recipient);
            contact_service = contact_service
                .with_notifier(ContactNotifier::new(queue_service.clone(), recipient));
        }
        None => tracing::warn!("No contact email configured, notifications disabled"),
    }

    // Background worker
    let worker = Arc::new(
        QueueWorker::new(job_queue, config.queue.poll_interval())
            .with_concurrency(config.queue.concurrency)
            .register(SEND_EMAIL_JOB, Arc::new(EmailJobHandler::new(email_service))),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let state = AppState::new(pool.clone(), contact_service);
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::error!("Queue worker task failed: {}", e);
    }
    pool.close().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
