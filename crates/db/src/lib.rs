//! In-process catalogue store for authors and books.
//!
//! The store owns referential integrity: every book points at an existing
//! author, and deleting an author cascades to the author's books. The
//! author→books back-reference is kept as an explicit index.

pub mod fixtures;
pub mod models;
pub mod module;
pub mod store;

pub use models::{Author, AuthorWithBooks, Book, BookDraft, BookPatch, BookWithAuthor, NewBook};
pub use module::StoreModule;
pub use store::{Store, StoreError};
