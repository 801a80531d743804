use serde::{Deserialize, Serialize};

/// Author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
}

/// Book record. Serialized with the owning author's id under `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub publication_year: i32,
    #[serde(rename = "author")]
    pub author_id: u64,
}

/// A book joined with its author's name, the unit list queries work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithAuthor {
    pub book: Book,
    pub author_name: String,
}

/// An author together with the books that reference it, ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}

/// Fields for inserting a book under an existing author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub publication_year: i32,
    pub author_id: u64,
}

/// A book created together with its author, before the author id exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub publication_year: i32,
}

/// Changes applied to a stored book; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author_id: Option<u64>,
}

impl From<NewBook> for BookPatch {
    fn from(book: NewBook) -> Self {
        Self {
            title: Some(book.title),
            publication_year: Some(book.publication_year),
            author_id: Some(book.author_id),
        }
    }
}
