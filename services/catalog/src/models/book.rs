//! Book models

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Fixed set of catalog genres, stored as their literal titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Detective,
    Classic,
    Adventures,
    Fantasy,
    Humor,
    Kids,
    Love,
    Modern,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Detective,
        Category::Classic,
        Category::Adventures,
        Category::Fantasy,
        Category::Humor,
        Category::Kids,
        Category::Love,
        Category::Modern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Detective => "Детективы, остросюжетная литература",
            Category::Classic => "Классика",
            Category::Adventures => "Приключения, историческая литература",
            Category::Fantasy => "Фантастика",
            Category::Humor => "Юмор",
            Category::Kids => "Детские",
            Category::Love => "Любовно-слезоточивая литература",
            Category::Modern => "Современная литература",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: Uuid,
    pub category: Category,
    pub author: String,
    pub series: String,
    pub name: String,
    pub annotation: String,
    /// Location of the full text
    pub link: String,
    pub access: String,
    pub publication: DateTime<Utc>,
}

/// Book creation and edit payload
#[derive(Debug, Clone)]
pub struct NewBook {
    pub category: Category,
    pub author: String,
    pub series: String,
    pub name: String,
    pub annotation: String,
    pub link: String,
    pub access: String,
    pub publication: DateTime<Utc>,
}

/// Book create/edit form fields
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct BookForm {
    pub category: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub name: Option<String>,
    pub annotation: Option<String>,
    pub access: Option<String>,
    pub link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_literals() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!(" Фантастика ".parse::<Category>().unwrap(), Category::Fantasy);
        assert!("Poetry".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_string(&Category::Humor).unwrap(),
            "\"Юмор\""
        );
    }
}
