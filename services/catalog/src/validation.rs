//! Form validation for catalog search and administration

use auth::{Role, validation::field};
use chrono::Utc;

use crate::catalog::{BookFilter, FilterField};
use crate::error::{ApiError, ApiResult};
use crate::models::{BookForm, Category, NewBook, SearchForm, UserEditForm};

/// The one filled field of a reader search form
pub fn single_search_field(form: &SearchForm) -> ApiResult<BookFilter> {
    let filled: Vec<BookFilter> = [
        (FilterField::Category, &form.category),
        (FilterField::Author, &form.author),
        (FilterField::Series, &form.series),
        (FilterField::Name, &form.name),
    ]
    .into_iter()
    .filter_map(|(f, value)| field(value).map(|v| BookFilter::new(f, v)))
    .collect();

    match <[BookFilter; 1]>::try_from(filled) {
        Ok([filter]) => Ok(filter),
        Err(_) => Err(ApiError::Validation(
            "Exactly one search field must be filled".to_string(),
        )),
    }
}

/// Validate a book form; every field is required
pub fn validate_book(form: &BookForm) -> ApiResult<NewBook> {
    let (
        Some(category),
        Some(author),
        Some(series),
        Some(name),
        Some(annotation),
        Some(access),
        Some(link),
    ) = (
        field(&form.category),
        field(&form.author),
        field(&form.series),
        field(&form.name),
        field(&form.annotation),
        field(&form.access),
        field(&form.link),
    )
    else {
        return Err(ApiError::Validation("All fields are required".to_string()));
    };

    let category: Category = category
        .parse()
        .map_err(|e: crate::models::book::UnknownCategory| ApiError::Validation(e.to_string()))?;

    Ok(NewBook {
        category,
        author: author.to_string(),
        series: series.to_string(),
        name: name.to_string(),
        annotation: annotation.to_string(),
        link: link.to_string(),
        access: access.to_string(),
        publication: Utc::now(),
    })
}

/// Validate an administrator's user edit form
pub fn validate_user_edit(form: &UserEditForm) -> ApiResult<auth::models::UserAccess> {
    let role: Role = field(&form.role)
        .ok_or_else(|| ApiError::Validation("Role is required".to_string()))?
        .parse()
        .map_err(|e: auth::models::UnknownRole| ApiError::Validation(e.to_string()))?;

    Ok(auth::models::UserAccess {
        role,
        active: field(&form.active).is_some(),
    })
}
