//! Page-number pagination for list endpoints.

use bookshelf_http::error::AppError;
use serde::Serialize;

use super::QueryParams;

pub const PAGE_PARAM: &str = "page";

/// One page of a list response.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Cut `items` down to the page requested by `page` in `params`.
///
/// `page` accepts a 1-based number or `last`. Anything else, or a page past
/// the end, is not found. Page 1 always exists, even for an empty list.
pub fn paginate<T>(
    items: Vec<T>,
    params: &QueryParams,
    page_size: usize,
    path: &str,
) -> Result<Page<T>, AppError> {
    let page_size = page_size.max(1);
    let count = items.len();
    let page_count = count.div_ceil(page_size).max(1);

    let number = match params.get(PAGE_PARAM).map(|raw| raw.trim()) {
        None | Some("") => 1,
        Some("last") => page_count,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=page_count).contains(n))
            .ok_or_else(|| AppError::not_found("Invalid page."))?,
    };

    let results = items
        .into_iter()
        .skip((number - 1) * page_size)
        .take(page_size)
        .collect();

    let next = (number < page_count).then(|| page_link(path, params, Some(number + 1)));
    let previous = (number > 1).then(|| page_link(path, params, (number > 2).then_some(number - 1)));

    Ok(Page {
        count,
        next,
        previous,
        results,
    })
}

/// `path` with the current query string, `page` replaced (or dropped for page 1).
fn page_link(path: &str, params: &QueryParams, page: Option<usize>) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .filter(|(key, _)| key.as_str() != PAGE_PARAM)
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect();
    if let Some(page) = page {
        pairs.push(format!("{PAGE_PARAM}={page}"));
    }

    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_page_links_forward_only() {
        let page = paginate((1..=25).collect(), &params(&[]), 10, "/api/books").unwrap();
        assert_eq!(page.count, 25);
        assert_eq!(page.results, (1..=10).collect::<Vec<_>>());
        assert_eq!(page.next.as_deref(), Some("/api/books?page=2"));
        assert_eq!(page.previous, None);
    }

    #[test]
    fn links_keep_other_parameters() {
        let query = params(&[("page", "2"), ("search", "Harry Potter")]);
        let page = paginate((1..=25).collect(), &query, 10, "/api/books").unwrap();
        assert_eq!(page.results, (11..=20).collect::<Vec<_>>());
        assert_eq!(
            page.next.as_deref(),
            Some("/api/books?search=Harry%20Potter&page=3")
        );
        assert_eq!(page.previous.as_deref(), Some("/api/books?search=Harry%20Potter"));
    }

    #[test]
    fn last_page_keyword() {
        let query = params(&[("page", "last")]);
        let page = paginate((1..=25).collect(), &query, 10, "/api/books").unwrap();
        assert_eq!(page.results, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.next, None);
        assert_eq!(page.previous.as_deref(), Some("/api/books?page=2"));
    }

    #[test]
    fn empty_list_has_a_first_page() {
        let page = paginate(Vec::<u32>::new(), &params(&[]), 10, "/api/books").unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert_eq!(page.next, None);
    }

    #[test]
    fn invalid_pages_are_not_found() {
        for raw in ["0", "4", "-1", "two"] {
            let query = params(&[("page", raw)]);
            let err = paginate((1..=25).collect::<Vec<u32>>(), &query, 10, "/api/books").unwrap_err();
            assert!(matches!(err, AppError::NotFound { .. }), "page={raw}");
        }
    }
}
