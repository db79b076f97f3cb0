//! Catalog service routes
//!
//! Reader routes require a `USER` session and administrator routes an
//! `ADMIN` session; both groups sit behind the authorization gate. The
//! login, signup and logout endpoints come from the `auth` crate.

use axum::{Router, middleware, routing::get};

use auth::{Role, middleware::authorize};

use crate::state::AppState;

pub mod admin;
pub mod reader;

/// Rows per catalog page at every listing
pub const PAGE_SIZE: usize = 12;

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    let reader_routes = Router::new()
        .route("/user", get(reader::start_page))
        .route("/user/books", get(reader::list_books))
        .route(
            "/user/books/search",
            get(reader::search_page).post(reader::search),
        )
        .route("/user/books/open/:id", get(reader::open_book))
        .route("/user/books/read/:id", get(reader::read_book))
        .route_layer(middleware::from_fn_with_state(
            state.auth.gate(Role::User),
            authorize,
        ));

    let admin_routes = Router::new()
        .route("/admin", get(admin::start_page))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/delete/:id", get(admin::delete_user))
        .route(
            "/admin/users/edit/:id",
            get(admin::edit_user_page).post(admin::edit_user),
        )
        .route(
            "/admin/books",
            get(admin::list_books).post(admin::search_by_link),
        )
        .route(
            "/admin/books/new",
            get(admin::new_book_page).post(admin::add_book),
        )
        .route("/admin/books/open/:id", get(reader::open_book))
        .route("/admin/books/read/:id", get(reader::read_book))
        .route("/admin/books/delete/:id", get(admin::delete_book))
        .route(
            "/admin/books/edit/:id",
            get(admin::edit_book_page).post(admin::edit_book),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.gate(Role::Admin),
            authorize,
        ));

    Router::new()
        .merge(reader_routes)
        .merge(admin_routes)
        .with_state(state.clone())
        .merge(auth::routes::create_router(state.auth))
}
