//! Book list query resolution: field filters, then free-text search, then ordering.

use std::cmp::Ordering;
use std::num::IntErrorKind;
use std::str::FromStr;

use bookshelf_db::BookWithAuthor;

use crate::query::ordering::{parse_ordering, sort_by_terms, OrderTerm, ORDERING_PARAM};
use crate::query::{icontains, non_blank, QueryError, QueryParams};

pub const SEARCH_PARAM: &str = "search";

/// Sort dimensions accepted by `ordering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOrderKey {
    Id,
    Title,
    PublicationYear,
    AuthorName,
}

impl FromStr for BookOrderKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "id" => Ok(Self::Id),
            "title" => Ok(Self::Title),
            "publication_year" => Ok(Self::PublicationYear),
            "author__name" => Ok(Self::AuthorName),
            _ => Err(()),
        }
    }
}

pub const DEFAULT_ORDERING: &[OrderTerm<BookOrderKey>] = &[OrderTerm::asc(BookOrderKey::Title)];

/// Field filters recognised on the book list. Every present filter must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub year: Option<i32>,
    pub year_gt: Option<i32>,
    pub year_gte: Option<i32>,
    pub year_lt: Option<i32>,
    pub year_lte: Option<i32>,
    /// lowercase
    pub title_contains: Option<String>,
    pub title_exact: Option<String>,
    /// lowercase
    pub title_starts_with: Option<String>,
    /// lowercase
    pub author_name_contains: Option<String>,
    pub author_name_exact: Option<String>,
}

fn year_param(params: &QueryParams, key: &str) -> Result<Option<i32>, QueryError> {
    non_blank(params, key)
        .map(|raw| {
            raw.parse::<i32>().map_err(|err| {
                let (param, value) = (key.to_string(), raw.to_string());
                match err.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        QueryError::YearOutOfRange { param, value }
                    }
                    _ => QueryError::InvalidNumber { param, value },
                }
            })
        })
        .transpose()
}

fn lowercase_param(params: &QueryParams, key: &str) -> Option<String> {
    non_blank(params, key).map(str::to_lowercase)
}

/// Compared verbatim; only blankness is judged on the trimmed value.
fn exact_param(params: &QueryParams, key: &str) -> Option<String> {
    non_blank(params, key).and(params.get(key)).cloned()
}

impl BookFilter {
    /// Read the recognised filter keys; anything else in `params` is ignored.
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryError> {
        Ok(Self {
            year: year_param(params, "publication_year")?,
            year_gt: year_param(params, "publication_year__gt")?,
            year_gte: year_param(params, "publication_year__gte")?,
            year_lt: year_param(params, "publication_year__lt")?,
            year_lte: year_param(params, "publication_year__lte")?,
            title_contains: lowercase_param(params, "title"),
            title_exact: exact_param(params, "title__exact"),
            title_starts_with: lowercase_param(params, "title__startswith"),
            author_name_contains: lowercase_param(params, "author__name"),
            author_name_exact: exact_param(params, "author__name__exact"),
        })
    }

    pub fn matches(&self, row: &BookWithAuthor) -> bool {
        let year = row.book.publication_year;
        let title = &row.book.title;
        let author = &row.author_name;

        self.year.map_or(true, |v| year == v)
            && self.year_gt.map_or(true, |v| year > v)
            && self.year_gte.map_or(true, |v| year >= v)
            && self.year_lt.map_or(true, |v| year < v)
            && self.year_lte.map_or(true, |v| year <= v)
            && self
                .title_contains
                .as_deref()
                .map_or(true, |v| icontains(title, v))
            && self.title_exact.as_deref().map_or(true, |v| title == v)
            && self
                .title_starts_with
                .as_deref()
                .map_or(true, |v| title.to_lowercase().starts_with(v))
            && self
                .author_name_contains
                .as_deref()
                .map_or(true, |v| icontains(author, v))
            && self
                .author_name_exact
                .as_deref()
                .map_or(true, |v| author == v)
    }
}

/// Stage 1: keep rows satisfying every field filter.
pub fn apply_filters(rows: Vec<BookWithAuthor>, filter: &BookFilter) -> Vec<BookWithAuthor> {
    rows.into_iter().filter(|row| filter.matches(row)).collect()
}

/// Stage 2: keep rows whose title or author name contains `query`, ignoring case.
pub fn apply_search(rows: Vec<BookWithAuthor>, query: Option<&str>) -> Vec<BookWithAuthor> {
    let Some(query) = query else {
        return rows;
    };
    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| icontains(&row.book.title, &needle) || icontains(&row.author_name, &needle))
        .collect()
}

fn compare(a: &BookWithAuthor, b: &BookWithAuthor, key: BookOrderKey) -> Ordering {
    match key {
        BookOrderKey::Id => a.book.id.cmp(&b.book.id),
        BookOrderKey::Title => a.book.title.cmp(&b.book.title),
        BookOrderKey::PublicationYear => a.book.publication_year.cmp(&b.book.publication_year),
        BookOrderKey::AuthorName => a.author_name.cmp(&b.author_name),
    }
}

/// Stage 3: stable composite sort.
pub fn apply_ordering(
    mut rows: Vec<BookWithAuthor>,
    terms: &[OrderTerm<BookOrderKey>],
) -> Vec<BookWithAuthor> {
    sort_by_terms(&mut rows, terms, compare);
    rows
}

/// A fully parsed book list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryResolver {
    filter: BookFilter,
    search: Option<String>,
    ordering: Vec<OrderTerm<BookOrderKey>>,
}

impl ListQueryResolver {
    /// Parse every recognised parameter up front so a bad value fails before any work.
    pub fn from_params(params: &QueryParams) -> Result<Self, QueryError> {
        Ok(Self {
            filter: BookFilter::from_params(params)?,
            search: non_blank(params, SEARCH_PARAM).map(str::to_string),
            ordering: parse_ordering(params.get(ORDERING_PARAM).map(String::as_str), DEFAULT_ORDERING)?,
        })
    }

    pub fn resolve(&self, rows: Vec<BookWithAuthor>) -> Vec<BookWithAuthor> {
        let rows = apply_filters(rows, &self.filter);
        let rows = apply_search(rows, self.search.as_deref());
        apply_ordering(rows, &self.ordering)
    }
}
