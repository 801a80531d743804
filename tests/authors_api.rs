mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{app, current_year};

#[tokio::test]
async fn list_nests_books_and_orders_by_name() {
    let app = app().await;
    let response = app.get("/api/authors").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["count"], 3);
    let names: Vec<&str> = response
        .results()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["George R.R. Martin", "J.K. Rowling", "J.R.R. Tolkien"]);

    let rowling = &response.results()[1];
    assert_eq!(rowling["books"].as_array().unwrap().len(), 2);
    assert_eq!(rowling["books"][0]["author"], rowling["id"]);
}

#[tokio::test]
async fn list_search_and_ordering() {
    let app = app().await;
    let response = app.get("/api/authors?search=r.r.&ordering=-id").await;
    let ids: Vec<u64> = response
        .results()
        .iter()
        .map(|a| a["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2]);

    let rejected = app.get("/api/authors?ordering=publication_year").await;
    assert_eq!(rejected.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn detail_includes_books() {
    let app = app().await;
    let response = app.get("/api/authors/2").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "id": 2,
            "name": "J.R.R. Tolkien",
            "books": [{"id": 3, "title": "The Hobbit", "publication_year": 1937, "author": 2}]
        })
    );
    assert_eq!(app.get("/api/authors/9").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_author_with_nested_books() {
    let app = app().await;
    let response = app
        .send(
            Method::POST,
            "/api/authors/create",
            json!({
                "name": "Frank Herbert",
                "books": [
                    {"title": "Dune", "publication_year": 1965},
                    {"title": "Dune Messiah", "publication_year": 1969}
                ]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let author_id = response.body["id"].as_u64().unwrap();
    let books = response.body["books"].as_array().unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b["author"] == author_id));

    let listed = app.get("/api/books?author__name__exact=Frank%20Herbert").await;
    assert_eq!(listed.results().len(), 2);
}

#[tokio::test]
async fn create_author_without_books() {
    let app = app().await;
    let response = app
        .send(Method::POST, "/api/authors/create", json!({"name": "Octavia E. Butler"}))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["books"], json!([]));
}

#[tokio::test]
async fn invalid_nested_book_writes_nothing() {
    let app = app().await;
    let response = app
        .send(
            Method::POST,
            "/api/authors/create",
            json!({
                "name": "Frank Herbert",
                "books": [
                    {"title": "Dune", "publication_year": 1965},
                    {"title": "Sequel", "publication_year": current_year() + 1}
                ]
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["books[1].publication_year"]);
    assert_eq!(app.store.list_authors().await.len(), 3);
    assert_eq!(app.store.list_books().await.len(), 4);
}

#[tokio::test]
async fn rename_author() {
    let app = app().await;

    let missing_name = app
        .send(Method::PUT, "/api/authors/update/2", json!({}))
        .await;
    assert_eq!(missing_name.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing_name.error_fields(), vec!["name"]);

    let unchanged = app
        .send(Method::PATCH, "/api/authors/update/2", json!({}))
        .await;
    assert_eq!(unchanged.status, StatusCode::OK);
    assert_eq!(unchanged.body["name"], "J.R.R. Tolkien");

    let renamed = app
        .send(
            Method::PUT,
            "/api/authors/update/2",
            json!({"name": "John Ronald Reuel Tolkien"}),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["name"], "John Ronald Reuel Tolkien");
    assert_eq!(renamed.body["books"].as_array().unwrap().len(), 1);

    // The new name is visible to book queries through the author relation
    let books = app.get("/api/books?author__name=ronald").await;
    assert_eq!(books.results().len(), 1);
}

#[tokio::test]
async fn deleting_author_cascades() {
    let app = app().await;
    let response = app
        .request(Method::DELETE, "/api/authors/delete/1", true, None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get("/api/authors/1").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/books/1").await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/books/2").await.status, StatusCode::NOT_FOUND);

    let remaining = app.get("/api/books").await;
    assert_eq!(remaining.body["count"], 2);
    assert!(remaining.results().iter().all(|b| b["author"] != 1));
}

#[tokio::test]
async fn anonymous_author_writes_are_forbidden() {
    let app = app().await;
    for (method, uri) in [
        (Method::POST, "/api/authors/create"),
        (Method::PUT, "/api/authors/update/1"),
        (Method::PATCH, "/api/authors/update/1"),
        (Method::DELETE, "/api/authors/delete/1"),
    ] {
        let response = app
            .send_anonymous(method.clone(), uri, json!({"name": "Anonymous"}))
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {uri}");
    }

    assert_eq!(app.store.list_authors().await.len(), 3);
    assert_eq!(app.store.list_books().await.len(), 4);
}

#[tokio::test]
async fn health_and_docs_are_public() {
    let app = app().await;
    assert_eq!(app.get("/healthz").await.status, StatusCode::OK);
    assert_eq!(app.get("/api/authors/health").await.status, StatusCode::OK);

    let docs = app.get("/docs/openapi.json").await;
    assert_eq!(docs.status, StatusCode::OK);
    assert!(docs.body["paths"]["/api/books"]["get"].is_object());
    assert!(docs.body["paths"]["/api/authors/create"]["post"].is_object());
}
