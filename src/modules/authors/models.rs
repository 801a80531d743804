use bookshelf_db::{AuthorWithBooks, Book, BookDraft};
use bookshelf_http::error::FieldError;
use serde::{Deserialize, Serialize};

use crate::modules::books::models::{clean_text, NestedBookPayload};

pub const NAME_MAX_CHARS: usize = 100;

/// Author representation with nested books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorResponse {
    pub id: u64,
    pub name: String,
    pub books: Vec<Book>,
}

impl From<AuthorWithBooks> for AuthorResponse {
    fn from(value: AuthorWithBooks) -> Self {
        Self {
            id: value.author.id,
            name: value.author.name,
            books: value.books,
        }
    }
}

/// Body of author writes. `books` is only honoured on create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorPayload {
    pub name: Option<String>,
    #[serde(default)]
    pub books: Vec<NestedBookPayload>,
}

/// A validated author creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub books: Vec<BookDraft>,
}

fn validate_name(name: Option<String>, errors: &mut Vec<FieldError>) -> Option<String> {
    let Some(name) = name else {
        errors.push(FieldError::required("name"));
        return None;
    };
    clean_text("name", &name, NAME_MAX_CHARS)
        .map_err(|e| errors.push(e))
        .ok()
}

impl AuthorPayload {
    /// Validate the author and every nested book; nothing is accepted unless all pass.
    pub fn into_new_author(self, current_year: i32) -> Result<NewAuthor, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = validate_name(self.name, &mut errors);

        let mut books = Vec::with_capacity(self.books.len());
        for (index, payload) in self.books.into_iter().enumerate() {
            match payload.into_draft(current_year) {
                Ok(draft) => books.push(draft),
                Err(nested) => {
                    let parent = format!("books[{index}]");
                    errors.extend(nested.into_iter().map(|e| e.nested(&parent)));
                }
            }
        }

        match name {
            Some(name) if errors.is_empty() => Ok(NewAuthor { name, books }),
            _ => Err(errors),
        }
    }

    /// Validate a rename. `required` is false for partial updates.
    pub fn into_name(self, required: bool) -> Result<Option<String>, Vec<FieldError>> {
        if self.name.is_none() && !required {
            return Ok(None);
        }
        let mut errors = Vec::new();
        match validate_name(self.name, &mut errors) {
            Some(name) => Ok(Some(name)),
            None => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2024;

    fn nested(title: Option<&str>, year: Option<i32>) -> NestedBookPayload {
        NestedBookPayload {
            title: title.map(str::to_string),
            publication_year: year,
        }
    }

    #[test]
    fn author_with_books_validates() {
        let created = AuthorPayload {
            name: Some(" J.K. Rowling ".into()),
            books: vec![nested(Some("HP 1"), Some(1997))],
        }
        .into_new_author(YEAR)
        .unwrap();
        assert_eq!(created.name, "J.K. Rowling");
        assert_eq!(created.books.len(), 1);
    }

    #[test]
    fn nested_errors_are_indexed() {
        let errors = AuthorPayload {
            name: Some("Frank Herbert".into()),
            books: vec![
                nested(Some("Dune"), Some(1965)),
                nested(Some(" "), Some(YEAR + 1)),
            ],
        }
        .into_new_author(YEAR)
        .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["books[1].title", "books[1].publication_year"]);
    }

    #[test]
    fn name_is_required_unless_partial() {
        assert!(AuthorPayload::default().into_name(true).is_err());
        assert_eq!(AuthorPayload::default().into_name(false), Ok(None));
        let long = AuthorPayload {
            name: Some("n".repeat(NAME_MAX_CHARS + 1)),
            books: Vec::new(),
        };
        assert!(long.into_name(false).is_err());
    }
}
