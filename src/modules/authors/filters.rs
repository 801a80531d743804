//! Author list query: name search and ordering.

use std::cmp::Ordering;
use std::str::FromStr;

use bookshelf_db::AuthorWithBooks;

use crate::query::ordering::{parse_ordering, sort_by_terms, OrderTerm, ORDERING_PARAM};
use crate::query::{icontains, non_blank, QueryError, QueryParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorOrderKey {
    Id,
    Name,
}

impl FromStr for AuthorOrderKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            _ => Err(()),
        }
    }
}

const DEFAULT_ORDERING: &[OrderTerm<AuthorOrderKey>] = &[OrderTerm::asc(AuthorOrderKey::Name)];

pub fn resolve_authors(
    mut authors: Vec<AuthorWithBooks>,
    params: &QueryParams,
) -> Result<Vec<AuthorWithBooks>, QueryError> {
    let ordering = parse_ordering(params.get(ORDERING_PARAM).map(String::as_str), DEFAULT_ORDERING)?;

    if let Some(query) = non_blank(params, "search") {
        let needle = query.to_lowercase();
        authors.retain(|a| icontains(&a.author.name, &needle));
    }

    sort_by_terms(&mut authors, &ordering, |a, b, key| -> Ordering {
        match key {
            AuthorOrderKey::Id => a.author.id.cmp(&b.author.id),
            AuthorOrderKey::Name => a.author.name.cmp(&b.author.name),
        }
    });
    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_db::Author;

    fn authors() -> Vec<AuthorWithBooks> {
        ["J.K. Rowling", "J.R.R. Tolkien", "George R.R. Martin"]
            .iter()
            .zip(1..)
            .map(|(name, id)| AuthorWithBooks {
                author: Author {
                    id,
                    name: name.to_string(),
                },
                books: Vec::new(),
            })
            .collect()
    }

    fn ids(pairs: &[(&str, &str)]) -> Result<Vec<u64>, QueryError> {
        let params: QueryParams = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Ok(resolve_authors(authors(), &params)?
            .iter()
            .map(|a| a.author.id)
            .collect())
    }

    #[test]
    fn default_order_is_by_name() {
        assert_eq!(ids(&[]).unwrap(), vec![3, 1, 2]);
    }

    #[test]
    fn search_and_descending_id() {
        assert_eq!(ids(&[("search", "r.r."), ("ordering", "-id")]).unwrap(), vec![3, 2]);
    }

    #[test]
    fn book_keys_are_not_author_keys() {
        assert_eq!(
            ids(&[("ordering", "title")]),
            Err(QueryError::UnknownOrderingKey { key: "title".into() })
        );
    }
}
