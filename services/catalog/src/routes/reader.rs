//! Reader (`USER`) endpoints; the book view and read endpoints are shared
//! with administrators

use axum::{
    Extension, Form, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use encoding_rs::WINDOWS_1251;
use serde_json::json;
use uuid::Uuid;

use auth::Principal;

use super::PAGE_SIZE;
use crate::{
    catalog::{Filters, Page, page_url},
    error::{ApiError, ApiResult},
    models::{ReaderListQuery, SearchForm, page_number},
    state::AppState,
    validation::single_search_field,
};

pub async fn start_page(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(json!({
        "page": "index",
        "username": principal.username,
        "role": principal.role,
    }))
}

/// Catalog listing, optionally filtered by category, author, series or name
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<ReaderListQuery>,
) -> ApiResult<Json<Page>> {
    let filter = Filters {
        category: query.category,
        author: query.author,
        series: query.series,
        name: query.name,
        link: None,
    }
    .resolve();

    let page = state
        .catalog
        .list(page_number(query.page.as_deref()), PAGE_SIZE, filter.as_ref())
        .await?;

    Ok(Json(page.with_url(page_url("/user/books", filter.as_ref()))))
}

pub async fn search_page() -> impl IntoResponse {
    Json(json!({ "page": "search" }))
}

/// Turn a search form into a filtered listing redirect
pub async fn search(Form(form): Form<SearchForm>) -> ApiResult<Redirect> {
    let filter = single_search_field(&form)?;

    Ok(Redirect::to(&format!(
        "/user/books?{}={}&page=1",
        filter.field.param(),
        urlencoding::encode(&filter.value)
    )))
}

/// Book details
pub async fn open_book(
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

/// Full text of a book, loaded from its source link and decoded from windows-1251
pub async fn read_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Book"))?;

    let content = tokio::fs::read(&book.link)
        .await
        .map_err(|e| ApiError::Upstream(format!("cannot read {}: {}", book.link, e)))?;

    // Library texts are windows-1251 unless they carry a BOM
    let (text, _, _) = WINDOWS_1251.decode(&content);

    Ok(Json(json!({
        "author": book.author,
        "name": book.name,
        "text": text,
    })))
}
