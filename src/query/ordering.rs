//! `ordering=key,-other` parsing and stable composite sorting.

use std::cmp::Ordering;
use std::str::FromStr;

use super::QueryError;

pub const ORDERING_PARAM: &str = "ordering";

/// One sort dimension of an `ordering` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerm<K> {
    pub key: K,
    pub descending: bool,
}

impl<K> OrderTerm<K> {
    pub const fn asc(key: K) -> Self {
        Self {
            key,
            descending: false,
        }
    }
}

/// Parse a comma-separated ordering list. Blank segments are skipped; a list
/// with no terms at all yields `default`.
pub fn parse_ordering<K>(raw: Option<&str>, default: &[OrderTerm<K>]) -> Result<Vec<OrderTerm<K>>, QueryError>
where
    K: FromStr + Copy,
{
    let mut terms = Vec::new();

    for segment in raw.unwrap_or_default().split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (name, descending) = match segment.strip_prefix('-') {
            Some(name) => (name, true),
            None => (segment, false),
        };
        let key = name
            .parse::<K>()
            .map_err(|_| QueryError::UnknownOrderingKey {
                key: name.to_string(),
            })?;
        terms.push(OrderTerm { key, descending });
    }

    if terms.is_empty() {
        terms.extend_from_slice(default);
    }
    Ok(terms)
}

/// Stable lexicographic sort over `terms`; rows equal on every term keep their input order.
pub fn sort_by_terms<T, K, F>(rows: &mut [T], terms: &[OrderTerm<K>], compare: F)
where
    K: Copy,
    F: Fn(&T, &T, K) -> Ordering,
{
    rows.sort_by(|a, b| {
        terms.iter().fold(Ordering::Equal, |acc, term| {
            acc.then_with(|| {
                let ord = compare(a, b, term.key);
                if term.descending {
                    ord.reverse()
                } else {
                    ord
                }
            })
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        Name,
        Rank,
    }

    impl FromStr for Key {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "name" => Ok(Key::Name),
                "rank" => Ok(Key::Rank),
                _ => Err(()),
            }
        }
    }

    const DEFAULT: &[OrderTerm<Key>] = &[OrderTerm::asc(Key::Name)];

    fn desc(key: Key) -> OrderTerm<Key> {
        OrderTerm {
            key,
            descending: true,
        }
    }

    #[test]
    fn parses_directions_in_order() {
        let terms = parse_ordering(Some("rank, -name"), DEFAULT).unwrap();
        assert_eq!(terms, vec![OrderTerm::asc(Key::Rank), desc(Key::Name)]);
    }

    #[test]
    fn absent_or_blank_uses_default() {
        assert_eq!(parse_ordering::<Key>(None, DEFAULT).unwrap(), DEFAULT.to_vec());
        assert_eq!(parse_ordering(Some(" , "), DEFAULT).unwrap(), DEFAULT.to_vec());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse_ordering(Some("name,-isbn"), DEFAULT).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownOrderingKey {
                key: "isbn".to_string()
            }
        );
    }

    #[test]
    fn composite_sort_is_stable() {
        // (name, rank, original position)
        let mut rows = vec![("b", 1, 0), ("a", 2, 1), ("b", 1, 2), ("a", 1, 3)];
        let terms = [desc(Key::Name), OrderTerm::asc(Key::Rank)];
        sort_by_terms(&mut rows, &terms, |x, y, key| match key {
            Key::Name => x.0.cmp(y.0),
            Key::Rank => x.1.cmp(&y.1),
        });
        let positions: Vec<_> = rows.iter().map(|row| row.2).collect();
        assert_eq!(positions, vec![0, 2, 3, 1]);
    }
}
