//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// `/me` is registered before the `{username}` capture so the static
/// segment wins; `me` is additionally a reserved username.
///
/// ```text
/// GET    /            -> list_users (admin)
/// POST   /            -> create_user (admin)
/// GET    /me          -> me_get (any authenticated)
/// PATCH  /me          -> me_patch (any authenticated)
/// GET    /{username}  -> get_user (admin)
/// PATCH  /{username}  -> update_user (admin)
/// DELETE /{username}  -> delete_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/me", get(users::me_get).patch(users::me_patch))
        .route(
            "/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
