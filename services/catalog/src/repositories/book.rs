//! Book repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::catalog::BookFilter;
use crate::models::{Book, Category, NewBook};

/// Persistence operations on catalog entries
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books matching `filter`, ordered by category then author
    async fn query_books(&self, filter: Option<&BookFilter>) -> DatabaseResult<Vec<Book>>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Book>>;

    async fn insert(&self, book: &NewBook) -> DatabaseResult<Book>;

    /// Returns false when no such book exists
    async fn update(&self, id: Uuid, book: &NewBook) -> DatabaseResult<bool>;

    /// Returns false when no such book exists
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

const BOOK_COLUMNS: &str =
    "book_id, category, author, series, name, annotation, link, access, publication";

/// Book repository backed by PostgreSQL
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `ILIKE` pattern matching `value` as a literal substring
pub(crate) fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn book_from_row(row: &PgRow) -> DatabaseResult<Book> {
    let category: String = row.try_get("category").map_err(DatabaseError::Query)?;
    let category: Category = category
        .parse()
        .map_err(|e| DatabaseError::Query(sqlx::Error::Decode(Box::new(e))))?;

    Ok(Book {
        id: row.try_get("book_id").map_err(DatabaseError::Query)?,
        category,
        author: row.try_get("author").map_err(DatabaseError::Query)?,
        series: row.try_get("series").map_err(DatabaseError::Query)?,
        name: row.try_get("name").map_err(DatabaseError::Query)?,
        annotation: row.try_get("annotation").map_err(DatabaseError::Query)?,
        link: row.try_get("link").map_err(DatabaseError::Query)?,
        access: row.try_get("access").map_err(DatabaseError::Query)?,
        publication: row.try_get("publication").map_err(DatabaseError::Query)?,
    })
}

#[async_trait]
impl BookStore for BookRepository {
    async fn query_books(&self, filter: Option<&BookFilter>) -> DatabaseResult<Vec<Book>> {
        let rows = match filter {
            None => {
                let sql = format!(
                    "SELECT {} FROM books ORDER BY category, author",
                    BOOK_COLUMNS
                );
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
            Some(filter) => {
                info!(
                    "Querying books by {}: {}",
                    filter.field.column(),
                    filter.value
                );
                // The column comes from a closed enum; the value is always bound
                let sql = format!(
                    "SELECT {} FROM books WHERE {} ILIKE $1 ORDER BY category, author",
                    BOOK_COLUMNS,
                    filter.field.column()
                );
                sqlx::query(&sql)
                    .bind(like_pattern(&filter.value))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(DatabaseError::Query)?;

        rows.iter().map(book_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Book>> {
        let sql = format!("SELECT {} FROM books WHERE book_id = $1", BOOK_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        row.as_ref().map(book_from_row).transpose()
    }

    async fn insert(&self, book: &NewBook) -> DatabaseResult<Book> {
        info!("Adding book: {} by {}", book.name, book.author);

        let sql = format!(
            r#"
            INSERT INTO books (category, author, series, name, annotation, link, access, publication)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(book.category.as_str())
            .bind(&book.author)
            .bind(&book.series)
            .bind(&book.name)
            .bind(&book.annotation)
            .bind(&book.link)
            .bind(&book.access)
            .bind(book.publication)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)?;

        book_from_row(&row)
    }

    async fn update(&self, id: Uuid, book: &NewBook) -> DatabaseResult<bool> {
        info!("Updating book: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE books
            SET category = $2, author = $3, series = $4, name = $5,
                annotation = $6, link = $7, access = $8, publication = $9
            WHERE book_id = $1
            "#,
        )
        .bind(id)
        .bind(book.category.as_str())
        .bind(&book.author)
        .bind(&book.series)
        .bind(&book.name)
        .bind(&book.annotation)
        .bind(&book.link)
        .bind(&book.access)
        .bind(book.publication)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting book: {}", id);

        let result = sqlx::query("DELETE FROM books WHERE book_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Lem"), "%Lem%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
        assert_eq!(like_pattern("' OR 1=1 --"), "%' OR 1=1 --%");
    }
}
