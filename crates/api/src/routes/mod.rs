//! Route definitions, one module per resource.

pub mod auth;
pub mod categories;
pub mod genres;
pub mod health;
pub mod titles;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                                     signup (public)
/// /auth/token                                      token exchange (public)
///
/// /categories                                      list (public), create (admin)
/// /categories/{slug}                               delete (admin)
/// /genres                                          list (public), create (admin)
/// /genres/{slug}                                   delete (admin)
///
/// /titles                                          list (public), create (admin)
/// /titles/{id}                                     get (public), patch/delete (admin)
/// /titles/{title_id}/reviews[/{id}]                nested reviews
/// /titles/{title_id}/reviews/{review_id}/comments[/{id}]  nested comments
///
/// /users                                           list, create (admin)
/// /users/me                                        get, patch (any authenticated)
/// /users/{username}                                get, patch, delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/genres", genres::router())
        .nest("/titles", titles::router())
        .nest("/users", users::router())
}
