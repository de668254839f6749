pub mod auth;
pub mod bookings;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod parts;
pub mod services;
pub mod users;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events/ws                         realtime event stream (WebSocket)
///
/// /auth/register                     register (public)
/// /auth/login                        login (public)
/// /auth/me                           current user + vehicles (auth)
///
/// /users                             list (admin; ?role, ?search)
/// /users/{id}                        get (admin or self), update (admin or self)
/// /users/{id}/vehicles               add vehicle (admin or self)
/// /users/{id}/role                   update role (admin)
/// /users/{id}                        delete (admin)
///
/// /services                          list (public; ?category), create (admin)
/// /services/{id}                     get (public), update, delete (admin)
///
/// /parts                             list (auth; ?category, ?model, ?lowStock), create (staff)
/// /parts/{id}                        get (auth), update (staff), delete (admin)
/// /parts/{id}/stock                  set stock level (staff, PATCH)
/// /parts/alerts/low-stock            low-stock report (staff)
///
/// /bookings                          list (auth; ?status, ?date), create (auth, multipart)
/// /bookings/my-bookings              caller's bookings (auth)
/// /bookings/slots/available          availability grid (public; ?date)
/// /bookings/{id}                     get (owner or staff)
/// /bookings/{id}/status              status transition (auth, PUT)
/// /bookings/user/{userId}            purge user's bookings (admin, DELETE)
///
/// /notifications                     list (auth; ?isRead)
/// /notifications/unread-count        unread count (auth)
/// /notifications/{id}/read           mark read (auth, PUT)
/// /notifications/read/all            mark all read (auth, PUT)
/// /notifications/{id}                delete (auth)
///
/// /dashboard                         role-aware dashboard (auth)
/// /dashboard/customer-stats          customer stats (auth)
/// /dashboard/revenue                 revenue buckets (staff; ?period=week|month)
///
/// /chat                              chat automation proxy (public, POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Realtime event stream for dashboards.
        .route("/events/ws", get(ws::events_ws_handler))
        // Authentication (register, login, current user).
        .nest("/auth", auth::router())
        // Account administration and profiles.
        .nest("/users", users::router())
        // Service catalog.
        .nest("/services", services::router())
        // Parts inventory.
        .nest("/parts", parts::router())
        // Bookings, availability, and the admin purge.
        .nest("/bookings", bookings::router())
        // Notifications.
        .nest("/notifications", notifications::router())
        // Dashboards.
        .nest("/dashboard", dashboard::router())
        // Chat automation proxy.
        .nest("/chat", chat::router())
}
