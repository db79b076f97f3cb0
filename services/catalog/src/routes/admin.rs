//! Administrator (`ADMIN`) endpoints: user and catalog management

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use auth::{Principal, validation::field};

use super::PAGE_SIZE;
use crate::{
    catalog::{Filters, Page, page_url},
    error::{ApiError, ApiResult},
    models::{AdminListQuery, BookForm, LinkSearchForm, UserEditForm, page_number},
    state::AppState,
    validation::{validate_book, validate_user_edit},
};

pub async fn start_page(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({
        "page": "index",
        "username": principal.username,
        "role": principal.role,
    }))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Redirect> {
    if !state.users.delete(id).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!("User {} deleted by {}", id, admin.username);
    Ok(Redirect::to("/admin/users"))
}

pub async fn edit_user_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Change a user's role and active flag
///
/// Existing sessions of the user keep the role they were issued with.
pub async fn edit_user(
    State(state): State<AppState>,
    Extension(admin): Extension<Principal>,
    Path(id): Path<Uuid>,
    Form(form): Form<UserEditForm>,
) -> ApiResult<Redirect> {
    let access = validate_user_edit(&form)?;

    if !state.users.update_access(id, access).await? {
        return Err(ApiError::NotFound("User"));
    }

    info!(
        "User {} set to role={} active={} by {}",
        id, access.role, access.active, admin.username
    );
    Ok(Redirect::to("/admin/users"))
}

/// Catalog listing, optionally filtered by source link
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> ApiResult<Json<Page>> {
    let filter = Filters {
        link: query.link,
        ..Filters::default()
    }
    .resolve();

    let page = state
        .catalog
        .list(page_number(query.page.as_deref()), PAGE_SIZE, filter.as_ref())
        .await?;

    Ok(Json(page.with_url(page_url("/admin/books", filter.as_ref()))))
}

pub async fn search_by_link(Form(form): Form<LinkSearchForm>) -> Redirect {
    match field(&form.link) {
        Some(link) => Redirect::to(&format!(
            "/admin/books?link={}&page=1",
            urlencoding::encode(link)
        )),
        None => Redirect::to("/admin/books?page=1"),
    }
}

pub async fn new_book_page() -> impl IntoResponse {
    Json(json!({ "page": "new-book" }))
}

pub async fn add_book(
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> ApiResult<Redirect> {
    let book = validate_book(&form)?;
    state.books.insert(&book).await?;
    Ok(Redirect::to("/admin/books"))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Redirect> {
    if !state.books.delete(id).await? {
        return Err(ApiError::NotFound("Book"));
    }
    Ok(Redirect::to("/admin/books"))
}

pub async fn edit_book_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    Ok(Json(book))
}

pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<BookForm>,
) -> ApiResult<Redirect> {
    let book = validate_book(&form)?;

    if !state.books.update(id, &book).await? {
        return Err(ApiError::NotFound("Book"));
    }
    Ok(Redirect::to("/admin/books"))
}
