#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Method, Request, StatusCode},
    Router,
};
use bookshelf_app::build_registry;
use bookshelf_db::{fixtures, Store};
use bookshelf_kernel::settings::Settings;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TOKEN: &str = "test-token";

pub struct TestApp {
    pub router: Router,
    pub store: Store,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `results` of a page response
    pub fn results(&self) -> &Vec<Value> {
        self.body["results"].as_array().expect("page response")
    }

    /// Field names listed in a validation error
    pub fn error_fields(&self) -> Vec<String> {
        self.body["error"]["details"]
            .as_array()
            .expect("error details")
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect()
    }
}

/// Router over the demo catalogue (authors 1-3, books 1-4) with one API token.
///
/// Books: 1 "Harry Potter and the Philosopher's Stone" (1997, author 1),
/// 2 "Harry Potter and the Chamber of Secrets" (1998, author 1),
/// 3 "The Hobbit" (1937, author 2), 4 "A Game of Thrones" (1996, author 3).
pub async fn app() -> TestApp {
    app_with_page_size(10).await
}

pub async fn app_with_page_size(page_size: usize) -> TestApp {
    let mut settings = Settings::default();
    settings.pagination.page_size = page_size;
    settings
        .auth
        .tokens
        .insert(TOKEN.to_string(), "regular".to_string());

    let store = Store::new();
    fixtures::seed_demo(&store).await;

    let registry = build_registry(&store, &settings);
    let router = bookshelf_http::build_router(&registry, &settings).unwrap();
    TestApp { router, store }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authenticated: bool,
        body: Option<Value>,
    ) -> TestResponse {
        let authorization = authenticated.then(|| format!("Token {TOKEN}"));
        self.request_with_authorization(method, uri, authorization, body)
            .await
    }

    pub async fn request_with_authorization(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<String>,
        body: Option<Value>,
    ) -> TestResponse {
        let headers: Vec<(HeaderName, String)> = authorization
            .map(|value| (header::AUTHORIZATION, value))
            .into_iter()
            .collect();
        self.request_with_headers(method, uri, &headers, body).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        headers: &[(HeaderName, String)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            request = request.header(name, value.as_str());
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, false, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.request(method, uri, true, Some(body)).await
    }

    pub async fn send_anonymous(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.request(method, uri, false, Some(body)).await
    }
}

pub fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}
