//! Catalogue store shared across request handlers.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{Author, AuthorWithBooks, Book, BookDraft, BookPatch, BookWithAuthor, NewBook};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("author {0} does not exist")]
    AuthorNotFound(u64),

    #[error("book {0} does not exist")]
    BookNotFound(u64),
}

#[derive(Debug, Default)]
struct Catalogue {
    authors: BTreeMap<u64, Author>,
    books: BTreeMap<u64, Book>,
    /// author id -> ids of books referencing it
    books_by_author: BTreeMap<u64, BTreeSet<u64>>,
    next_author_id: u64,
    next_book_id: u64,
}

impl Catalogue {
    fn allocate_author_id(&mut self) -> u64 {
        self.next_author_id += 1;
        self.next_author_id
    }

    fn allocate_book_id(&mut self) -> u64 {
        self.next_book_id += 1;
        self.next_book_id
    }

    fn author(&self, id: u64) -> Result<&Author, StoreError> {
        self.authors.get(&id).ok_or(StoreError::AuthorNotFound(id))
    }

    fn insert_book(&mut self, title: String, publication_year: i32, author_id: u64) -> Book {
        let book = Book {
            id: self.allocate_book_id(),
            title,
            publication_year,
            author_id,
        };
        self.books_by_author
            .entry(author_id)
            .or_default()
            .insert(book.id);
        self.books.insert(book.id, book.clone());
        book
    }

    fn books_of(&self, author_id: u64) -> Vec<Book> {
        self.books_by_author
            .get(&author_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.books.get(id).cloned())
            .collect()
    }

    fn with_books(&self, author: &Author) -> AuthorWithBooks {
        AuthorWithBooks {
            author: author.clone(),
            books: self.books_of(author.id),
        }
    }
}

/// Cloneable handle to the catalogue.
///
/// Each write operation holds the write lock for its whole duration, so a
/// single call is atomic with respect to every other call.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Catalogue>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        let catalogue = self.inner.read().await;
        catalogue.authors.is_empty() && catalogue.books.is_empty()
    }

    /// Snapshot of every book joined with its author's name, in id order.
    pub async fn list_books(&self) -> Vec<BookWithAuthor> {
        let catalogue = self.inner.read().await;
        catalogue
            .books
            .values()
            .map(|book| BookWithAuthor {
                author_name: catalogue
                    .authors
                    .get(&book.author_id)
                    .map(|author| author.name.clone())
                    .unwrap_or_default(),
                book: book.clone(),
            })
            .collect()
    }

    pub async fn get_book(&self, id: u64) -> Result<Book, StoreError> {
        self.inner
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))
    }

    pub async fn create_book(&self, new: NewBook) -> Result<Book, StoreError> {
        let mut catalogue = self.inner.write().await;
        catalogue.author(new.author_id)?;
        Ok(catalogue.insert_book(new.title, new.publication_year, new.author_id))
    }

    /// Apply `patch` to book `id`, moving it between authors when the author changes.
    pub async fn update_book(&self, id: u64, patch: BookPatch) -> Result<Book, StoreError> {
        let mut catalogue = self.inner.write().await;
        let current = catalogue
            .books
            .get(&id)
            .cloned()
            .ok_or(StoreError::BookNotFound(id))?;

        if let Some(author_id) = patch.author_id {
            catalogue.author(author_id)?;
        }

        let updated = Book {
            id,
            title: patch.title.unwrap_or(current.title),
            publication_year: patch.publication_year.unwrap_or(current.publication_year),
            author_id: patch.author_id.unwrap_or(current.author_id),
        };

        if updated.author_id != current.author_id {
            if let Some(ids) = catalogue.books_by_author.get_mut(&current.author_id) {
                ids.remove(&id);
            }
            catalogue
                .books_by_author
                .entry(updated.author_id)
                .or_default()
                .insert(id);
        }
        catalogue.books.insert(id, updated.clone());
        Ok(updated)
    }

    pub async fn delete_book(&self, id: u64) -> Result<Book, StoreError> {
        let mut catalogue = self.inner.write().await;
        let book = catalogue
            .books
            .remove(&id)
            .ok_or(StoreError::BookNotFound(id))?;
        if let Some(ids) = catalogue.books_by_author.get_mut(&book.author_id) {
            ids.remove(&id);
        }
        Ok(book)
    }

    pub async fn list_authors(&self) -> Vec<AuthorWithBooks> {
        let catalogue = self.inner.read().await;
        catalogue
            .authors
            .values()
            .map(|author| catalogue.with_books(author))
            .collect()
    }

    pub async fn get_author(&self, id: u64) -> Result<AuthorWithBooks, StoreError> {
        let catalogue = self.inner.read().await;
        let author = catalogue.author(id)?;
        Ok(catalogue.with_books(author))
    }

    /// Ids of the books referencing `author_id`, ascending.
    pub async fn book_ids_of(&self, author_id: u64) -> Vec<u64> {
        self.inner
            .read()
            .await
            .books_by_author
            .get(&author_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Insert an author and all of its drafted books in one step.
    pub async fn create_author(&self, name: String, books: Vec<BookDraft>) -> AuthorWithBooks {
        let mut catalogue = self.inner.write().await;
        let author = Author {
            id: catalogue.allocate_author_id(),
            name,
        };
        catalogue.authors.insert(author.id, author.clone());
        catalogue.books_by_author.insert(author.id, BTreeSet::new());

        for draft in books {
            catalogue.insert_book(draft.title, draft.publication_year, author.id);
        }

        catalogue.with_books(&author)
    }

    pub async fn rename_author(&self, id: u64, name: String) -> Result<AuthorWithBooks, StoreError> {
        let mut catalogue = self.inner.write().await;
        let author = catalogue
            .authors
            .get_mut(&id)
            .ok_or(StoreError::AuthorNotFound(id))?;
        author.name = name;
        let author = author.clone();
        Ok(catalogue.with_books(&author))
    }

    /// Delete an author and every book referencing it. Returns the removed books.
    pub async fn delete_author(&self, id: u64) -> Result<Vec<Book>, StoreError> {
        let mut catalogue = self.inner.write().await;
        catalogue
            .authors
            .remove(&id)
            .ok_or(StoreError::AuthorNotFound(id))?;

        let book_ids = catalogue.books_by_author.remove(&id).unwrap_or_default();
        let removed = book_ids
            .into_iter()
            .filter_map(|book_id| catalogue.books.remove(&book_id))
            .collect();
        Ok(removed)
    }
}
