//! Catalog models for request and response payloads

pub mod book;

pub use book::{Book, BookForm, Category, NewBook};

use serde::Deserialize;

/// Query string of the reader catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReaderListQuery {
    /// Kept as text: unparsable values fall back to the first page
    pub page: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
}

/// Query string of the administrator catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminListQuery {
    pub page: Option<String>,
    pub link: Option<String>,
}

/// Reader search form; exactly one field may be filled
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub category: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
}

/// Administrator search-by-source-link form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkSearchForm {
    pub link: Option<String>,
}

/// Administrator user edit form; an absent `active` checkbox means inactive
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserEditForm {
    pub role: Option<String>,
    pub active: Option<String>,
}

/// Parse the `page` query parameter, defaulting to 1
pub fn page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse().ok()).unwrap_or(1)
}
