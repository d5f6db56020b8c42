pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public, student accounts)
/// /auth/login                         login (public)
///
/// /tickets                            list (auth), create (public)
/// /tickets/stats                      aggregate counts (staff)
/// /tickets/sweeps/overdue             run overdue/breach pass now (admin)
/// /tickets/sweeps/reminders           deliver pending reminders now (admin)
/// /tickets/{reference}                get with thread (auth)
/// /tickets/{reference}/responses      append response (auth)
/// /tickets/{reference}/notes          append internal note (staff)
/// /tickets/{reference}/status         change status (staff)
/// /tickets/{reference}/assignee       assign (staff)
///
/// /directory/departments              list departments (public)
/// /directory/staff                    list active staff (staff)
/// /directory/canned-responses         list reply templates (staff)
///
/// /users                              list, create (admin)
/// /users/{id}/deactivate              deactivate account (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        // Tickets
        .route(
            "/tickets",
            get(handlers::tickets::list_tickets).post(handlers::tickets::create_ticket),
        )
        .route("/tickets/stats", get(handlers::tickets::stats))
        .route(
            "/tickets/sweeps/overdue",
            post(handlers::tickets::run_overdue_sweep),
        )
        .route(
            "/tickets/sweeps/reminders",
            post(handlers::tickets::run_reminder_sweep),
        )
        .route("/tickets/{reference}", get(handlers::tickets::get_ticket))
        .route(
            "/tickets/{reference}/responses",
            post(handlers::tickets::add_response),
        )
        .route("/tickets/{reference}/notes", post(handlers::tickets::add_note))
        .route(
            "/tickets/{reference}/status",
            put(handlers::tickets::change_status),
        )
        .route(
            "/tickets/{reference}/assignee",
            put(handlers::tickets::assign),
        )
        // Directory
        .route(
            "/directory/departments",
            get(handlers::directory::list_departments),
        )
        .route("/directory/staff", get(handlers::directory::list_staff))
        .route(
            "/directory/canned-responses",
            get(handlers::directory::list_canned_responses),
        )
        // Users
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}/deactivate",
            post(handlers::users::deactivate_user),
        )
}
