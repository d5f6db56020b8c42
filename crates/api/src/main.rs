use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_api::auth::password::hash_password;
use helpdesk_api::background;
use helpdesk_api::config::ServerConfig;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_api::tickets::TicketService;
use helpdesk_core::roles::ROLE_SUPERADMIN;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::UserRepo;
use helpdesk_notify::Notifier;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = helpdesk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    helpdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    helpdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    bootstrap_superadmin(&pool).await;

    // --- Notifications ---
    let notifier = Arc::new(Notifier::from_env());

    // --- Ticket service ---
    let tickets = Arc::new(TicketService::new(pool.clone(), Arc::clone(&notifier)));

    // --- Background sweep ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::sweep::run(
        Arc::clone(&tickets),
        config.sweep_interval_secs,
        sweep_cancel.clone(),
    ));

    // --- App state & router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        tickets,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Ticket sweep job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Seed the first superadmin account when the user table is empty, so a
/// fresh deployment can be administered at all.
///
/// Credentials come from `ADMIN_EMAIL` / `ADMIN_PASSWORD`; the default
/// password is loudly logged and must be rotated immediately.
async fn bootstrap_superadmin(pool: &helpdesk_db::DbPool) {
    let count = UserRepo::count_all(pool)
        .await
        .expect("Failed to count users");
    if count > 0 {
        return;
    }

    let email = std::env::var("ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@helpdesk.campus.example".into());
    let (password, defaulted) = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) => (p, false),
        Err(_) => ("change-me-now".to_string(), true),
    };

    let password_hash = hash_password(&password).expect("Failed to hash bootstrap password");

    UserRepo::create(
        pool,
        &CreateUser {
            name: "Helpdesk Admin".into(),
            email: email.clone(),
            registration_number: None,
            role: ROLE_SUPERADMIN.into(),
            department: "Administration".into(),
            password_hash,
        },
    )
    .await
    .expect("Failed to create bootstrap superadmin");

    if defaulted {
        tracing::warn!(%email, "Bootstrap superadmin created with the DEFAULT password; set ADMIN_PASSWORD and rotate it now");
    } else {
        tracing::info!(%email, "Bootstrap superadmin created");
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
