//! Route definitions for the `/titles` resource and its nested reviews
//! and comments.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, reviews, titles};
use crate::state::AppState;

/// Routes mounted at `/titles`.
///
/// ```text
/// GET    /                                           -> list_titles (public)
/// POST   /                                           -> create_title (admin)
/// GET    /{id}                                       -> get_title (public)
/// PATCH  /{id}                                       -> update_title (admin)
/// DELETE /{id}                                       -> delete_title (admin)
///
/// GET    /{title_id}/reviews                         -> list_reviews (public)
/// POST   /{title_id}/reviews                         -> create_review (auth)
/// GET    /{title_id}/reviews/{id}                    -> get_review (public)
/// PATCH  /{title_id}/reviews/{id}                    -> update_review (author/mod)
/// DELETE /{title_id}/reviews/{id}                    -> delete_review (author/mod)
///
/// GET    /{title_id}/reviews/{review_id}/comments        -> list_comments (public)
/// POST   /{title_id}/reviews/{review_id}/comments        -> create_comment (auth)
/// GET    /{title_id}/reviews/{review_id}/comments/{id}   -> get_comment (public)
/// PATCH  /{title_id}/reviews/{review_id}/comments/{id}   -> update_comment (author/mod)
/// DELETE /{title_id}/reviews/{review_id}/comments/{id}   -> delete_comment (author/mod)
/// ```
pub fn router() -> Router<AppState> {
    let comment_routes = Router::new()
        .route(
            "/",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/{id}",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        );

    let review_routes = Router::new()
        .route("/", get(reviews::list_reviews).post(reviews::create_review))
        .route(
            "/{id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .nest("/{review_id}/comments", comment_routes);

    Router::new()
        .route("/", get(titles::list_titles).post(titles::create_title))
        .route(
            "/{id}",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        .nest("/{title_id}/reviews", review_routes)
}
