//! Book request payloads and write-path validation.

use bookshelf_db::{BookDraft, BookPatch, NewBook};
use bookshelf_http::error::FieldError;
use serde::Deserialize;
use time::OffsetDateTime;

pub const TITLE_MAX_CHARS: usize = 200;

/// Body of book create, full update and partial update requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPayload {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author: Option<u64>,
}

/// Book embedded in an author creation request; the author is implied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NestedBookPayload {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
}

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Trimmed, non-blank text no longer than `max_chars`.
pub fn clean_text(field: &str, raw: &str, max_chars: usize) -> Result<String, FieldError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FieldError::new(field, "This field may not be blank."));
    }
    if value.chars().count() > max_chars {
        return Err(FieldError::new(
            field,
            format!("Ensure this field has no more than {max_chars} characters."),
        ));
    }
    Ok(value.to_string())
}

pub fn validate_publication_year(year: i32, current_year: i32) -> Result<i32, FieldError> {
    if year > current_year {
        return Err(FieldError::new(
            "publication_year",
            format!("Publication year cannot be in the future. Current year is {current_year}."),
        ));
    }
    Ok(year)
}

fn required<T>(value: Option<T>, field: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::required(field));
    }
    value
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut Vec<FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(e)).ok()
}

impl BookPayload {
    /// Validate a create or full-update body: every field is required.
    pub fn into_new_book(self, current_year: i32) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = required(self.title, "title", &mut errors)
            .and_then(|t| collect(clean_text("title", &t, TITLE_MAX_CHARS), &mut errors));
        let year = required(self.publication_year, "publication_year", &mut errors)
            .and_then(|y| collect(validate_publication_year(y, current_year), &mut errors));
        let author_id = required(self.author, "author", &mut errors);

        match (title, year, author_id) {
            (Some(title), Some(publication_year), Some(author_id)) if errors.is_empty() => {
                Ok(NewBook {
                    title,
                    publication_year,
                    author_id,
                })
            }
            _ => Err(errors),
        }
    }

    /// Validate a partial-update body: only present fields are checked.
    pub fn into_patch(self, current_year: i32) -> Result<BookPatch, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self
            .title
            .and_then(|t| collect(clean_text("title", &t, TITLE_MAX_CHARS), &mut errors));
        let publication_year = self
            .publication_year
            .and_then(|y| collect(validate_publication_year(y, current_year), &mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(BookPatch {
            title,
            publication_year,
            author_id: self.author,
        })
    }
}

impl NestedBookPayload {
    pub fn into_draft(self, current_year: i32) -> Result<BookDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = required(self.title, "title", &mut errors)
            .and_then(|t| collect(clean_text("title", &t, TITLE_MAX_CHARS), &mut errors));
        let year = required(self.publication_year, "publication_year", &mut errors)
            .and_then(|y| collect(validate_publication_year(y, current_year), &mut errors));

        match (title, year) {
            (Some(title), Some(publication_year)) if errors.is_empty() => Ok(BookDraft {
                title,
                publication_year,
            }),
            _ => Err(errors),
        }
    }
}

/// Field error for a book pointing at a missing author.
pub fn unknown_author(author_id: u64) -> FieldError {
    FieldError::new(
        "author",
        format!("Invalid pk \"{author_id}\" - object does not exist."),
    )
}
