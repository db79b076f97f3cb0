//! Repositories for catalog persistence

pub mod book;
#[cfg(test)]
pub mod memory;

pub use book::{BookRepository, BookStore};
