//! Catalog query engine
//!
//! Retrieves the unfiltered or singly-filtered book list from a
//! [`BookStore`] (ordered by category, then author) and slices it into a
//! [`Page`] in memory.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::models::Book;
use crate::repositories::BookStore;

/// The five searchable book fields, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Category,
    Author,
    Series,
    Name,
    Link,
}

impl FilterField {
    /// Column of the `books` table matched by this field
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Category => "category",
            FilterField::Author => "author",
            FilterField::Series => "series",
            FilterField::Name => "name",
            FilterField::Link => "link",
        }
    }

    /// Query string parameter carrying this filter
    pub fn param(&self) -> &'static str {
        self.column()
    }
}

/// A single active search filter: case-insensitive substring match on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFilter {
    pub field: FilterField,
    pub value: String,
}

impl BookFilter {
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Whether `book` satisfies this filter
    pub fn matches(&self, book: &Book) -> bool {
        let haystack = match self.field {
            FilterField::Category => book.category.as_str(),
            FilterField::Author => book.author.as_str(),
            FilterField::Series => book.series.as_str(),
            FilterField::Name => book.name.as_str(),
            FilterField::Link => book.link.as_str(),
        };
        haystack
            .to_lowercase()
            .contains(&self.value.to_lowercase())
    }
}

/// Sparse filter set as it arrives from a query string
///
/// Blank values count as absent. When several are filled, the first in
/// the order category, author, series, name, link wins.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub category: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
    pub link: Option<String>,
}

impl Filters {
    pub fn resolve(&self) -> Option<BookFilter> {
        [
            (FilterField::Category, &self.category),
            (FilterField::Author, &self.author),
            (FilterField::Series, &self.series),
            (FilterField::Name, &self.name),
            (FilterField::Link, &self.link),
        ]
        .into_iter()
        .find_map(|(field, value)| {
            auth::validation::field(value).map(|v| BookFilter::new(field, v))
        })
    }
}

/// One page of the catalog plus navigation metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub books: Vec<Book>,
    /// Every page number, `1..=page_count`
    pub pages: Vec<usize>,
    pub page_count: usize,
    pub number: i64,
    /// Not clamped; the renderer hides out-of-range links
    pub next_number: i64,
    /// Not clamped; the renderer hides out-of-range links
    pub prev_number: i64,
    /// Link prefix; append a page number to navigate
    pub page_url: String,
}

impl Page {
    pub fn with_url(mut self, page_url: String) -> Self {
        self.page_url = page_url;
        self
    }
}

/// Slice `rows` into page `page_number` of `page_size` rows
///
/// Out-of-range pages, including numbers below 1, yield no books but keep
/// the page count. A zero page size yields no pages at all.
pub fn paginate(rows: Vec<Book>, page_number: i64, page_size: usize) -> Page {
    let total = rows.len();
    let page_count = if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    };

    let start = (i128::from(page_number) - 1) * page_size as i128;
    let books = if page_size == 0 || start < 0 || start >= total as i128 {
        Vec::new()
    } else {
        let start = start as usize;
        let end = start.saturating_add(page_size).min(total);
        rows.into_iter().skip(start).take(end - start).collect()
    };

    Page {
        books,
        pages: (1..=page_count).collect(),
        page_count,
        number: page_number,
        next_number: page_number.saturating_add(1),
        prev_number: page_number.saturating_sub(1),
        page_url: String::new(),
    }
}

/// Link prefix for the pages of a listing, qualified by the active filter
pub fn page_url(base: &str, filter: Option<&BookFilter>) -> String {
    match filter {
        Some(filter) => format!(
            "{}?{}={}&page=",
            base,
            filter.field.param(),
            urlencoding::encode(&filter.value)
        ),
        None => format!("{}?page=", base),
    }
}

/// Paged, filtered access to the catalog
#[derive(Clone)]
pub struct CatalogEngine {
    store: Arc<dyn BookStore>,
    timeout: Duration,
}

impl CatalogEngine {
    pub fn new(store: Arc<dyn BookStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// List page `page_number` of the books matching `filter`
    pub async fn list(
        &self,
        page_number: i64,
        page_size: usize,
        filter: Option<&BookFilter>,
    ) -> ApiResult<Page> {
        let rows = tokio::time::timeout(self.timeout, self.store.query_books(filter))
            .await
            .map_err(|_| ApiError::Upstream("catalog query timed out".to_string()))??;

        Ok(paginate(rows, page_number, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewBook};
    use crate::repositories::memory::InMemoryBookStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use common::error::DatabaseResult;
    use uuid::Uuid;

    fn new_book(category: Category, author: &str, name: &str) -> NewBook {
        NewBook {
            category,
            author: author.to_string(),
            series: format!("{} series", author),
            name: name.to_string(),
            annotation: String::new(),
            link: format!("/books/{}.txt", name),
            access: "public".to_string(),
            publication: Utc::now(),
        }
    }

    fn rows(n: usize) -> Vec<Book> {
        (0..n)
            .map(|i| Book {
                id: Uuid::new_v4(),
                category: Category::Classic,
                author: format!("Author {:02}", i),
                series: String::new(),
                name: format!("Book {}", i),
                annotation: String::new(),
                link: String::new(),
                access: String::new(),
                publication: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_twenty_five_rows_in_pages_of_twelve() {
        for (page, expected) in [(1, 12), (2, 12), (3, 1), (4, 0)] {
            let result = paginate(rows(25), page, 12);
            assert_eq!(result.books.len(), expected, "page {}", page);
            assert_eq!(result.page_count, 3);
            assert_eq!(result.pages, vec![1, 2, 3]);
        }

        let third = paginate(rows(25), 3, 12);
        assert_eq!(third.books[0].author, "Author 24");
    }

    #[test]
    fn test_non_positive_pages_are_empty() {
        for page in [0, -1, -100, i64::MIN] {
            let result = paginate(rows(25), page, 12);
            assert!(result.books.is_empty(), "page {}", page);
            assert_eq!(result.page_count, 3);
        }
    }

    #[test]
    fn test_empty_dataset() {
        let result = paginate(Vec::new(), 1, 12);
        assert!(result.books.is_empty());
        assert_eq!(result.page_count, 0);
        assert!(result.pages.is_empty());
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let result = paginate(rows(5), i64::MAX, 12);
        assert!(result.books.is_empty());
        assert_eq!(result.next_number, i64::MAX);
        assert_eq!(result.prev_number, i64::MAX - 1);
    }

    #[test]
    fn test_navigation_numbers_are_not_clamped() {
        let first = paginate(rows(5), 1, 12);
        assert_eq!(first.number, 1);
        assert_eq!(first.prev_number, 0);
        assert_eq!(first.next_number, 2);

        let beyond = paginate(rows(5), 7, 12);
        assert_eq!(beyond.prev_number, 6);
        assert_eq!(beyond.next_number, 8);
    }

    #[test]
    fn test_zero_page_size() {
        let result = paginate(rows(5), 1, 0);
        assert!(result.books.is_empty());
        assert_eq!(result.page_count, 0);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        assert_eq!(paginate(rows(24), 2, 12).books.len(), 12);
        assert_eq!(paginate(rows(24), 2, 12).page_count, 2);
        assert!(paginate(rows(24), 3, 12).books.is_empty());
    }

    #[test]
    fn test_only_the_filled_filter_applies() {
        let filters = Filters {
            category: Some("Фантастика".to_string()),
            author: Some(String::new()),
            ..Filters::default()
        };
        assert_eq!(
            filters.resolve(),
            Some(BookFilter::new(FilterField::Category, "Фантастика"))
        );

        let blank = Filters {
            author: Some("   ".to_string()),
            ..Filters::default()
        };
        assert_eq!(blank.resolve(), None);
    }

    #[test]
    fn test_first_filled_filter_wins() {
        let filters = Filters {
            series: Some("Foundation".to_string()),
            author: Some("Asimov".to_string()),
            link: Some("/books".to_string()),
            ..Filters::default()
        };
        assert_eq!(
            filters.resolve(),
            Some(BookFilter::new(FilterField::Author, "Asimov"))
        );

        let filters = Filters {
            name: Some("Solaris".to_string()),
            link: Some("/books".to_string()),
            ..Filters::default()
        };
        assert_eq!(filters.resolve().unwrap().field, FilterField::Name);
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("/admin/books", None), "/admin/books?page=");
        let filter = BookFilter::new(FilterField::Author, "Лем & Co");
        assert_eq!(
            page_url("/user/books", Some(&filter)),
            "/user/books?author=%D0%9B%D0%B5%D0%BC%20%26%20Co&page="
        );
    }

    #[tokio::test]
    async fn test_list_filters_case_insensitively_and_orders() {
        let store = InMemoryBookStore::new();
        store.seed(new_book(Category::Modern, "Pelevin", "Generation P")).await;
        store.seed(new_book(Category::Fantasy, "Strugatsky", "Roadside Picnic")).await;
        store.seed(new_book(Category::Fantasy, "Lem", "Solaris")).await;
        store.seed(new_book(Category::Classic, "Chekhov", "The Seagull")).await;

        let engine = CatalogEngine::new(Arc::new(store), Duration::from_secs(5));

        let all = engine.list(1, 12, None).await.unwrap();
        let order: Vec<_> = all.books.iter().map(|b| b.author.as_str()).collect();
        // Category titles sort as text, then authors within a category
        assert_eq!(order, vec!["Chekhov", "Pelevin", "Lem", "Strugatsky"]);
        assert_eq!(all.page_count, 1);

        let filters = Filters {
            category: Some("фАНТАСТ".to_string()),
            author: Some("Pelevin".to_string()),
            ..Filters::default()
        };
        let fantasy = engine
            .list(1, 12, filters.resolve().as_ref())
            .await
            .unwrap();
        let names: Vec<_> = fantasy.books.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Solaris", "Roadside Picnic"]);

        let filter = BookFilter::new(FilterField::Name, "%");
        let none = engine.list(1, 12, Some(&filter)).await.unwrap();
        assert!(none.books.is_empty());
        assert_eq!(none.page_count, 0);
    }

    struct SlowStore;

    #[async_trait]
    impl BookStore for SlowStore {
        async fn query_books(&self, _filter: Option<&BookFilter>) -> DatabaseResult<Vec<Book>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: Uuid) -> DatabaseResult<Option<Book>> {
            Ok(None)
        }

        async fn insert(&self, _book: &NewBook) -> DatabaseResult<Book> {
            unreachable!("not used by the engine")
        }

        async fn update(&self, _id: Uuid, _book: &NewBook) -> DatabaseResult<bool> {
            Ok(false)
        }

        async fn delete(&self, _id: Uuid) -> DatabaseResult<bool> {
            Ok(false)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out() {
        let engine = CatalogEngine::new(Arc::new(SlowStore), Duration::from_secs(2));
        let err = engine.list(1, 12, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
