//! HTTP handlers for the books resource (JSON bodies, id-keyed paths).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::Value;

use catalog_http::error::AppError;
use catalog_http::response;
use catalog_kernel::Db;

use crate::utils;

use super::models::{Book, BookPayload};

const RESOURCE: &str = "books";

/// A book id must parse as an integer; anything else is a bad request,
/// not a missing resource.
fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::invalid_request_with("Bad request", "Invalid book id"))
}

fn book_not_found(id: i64) -> AppError {
    AppError::not_found_with(
        "Book not found",
        format!("No book was found for the given id({id})"),
    )
}

/// Validate a raw JSON body into a [`BookPayload`]: every required key
/// present, publication date strictly `YYYY-MM-DD`, fields deserializable.
/// Validation happens before any database write so an invalid body never
/// mutates state.
fn validated_payload(body: Result<Json<Value>, JsonRejection>) -> Result<BookPayload, AppError> {
    let Json(value) = body
        .map_err(|rejection| AppError::invalid_request_with("Bad request", rejection.to_string()))?;

    let missing = utils::missing_book_fields(&value);
    if !missing.is_empty() {
        return Err(AppError::invalid_request_with(
            "Missing required field",
            format!("Missing required fields: {missing:?}"),
        ));
    }

    let raw_date = value
        .get("publication_date")
        .and_then(Value::as_str)
        .unwrap_or_default();
    utils::parse_publication_date(raw_date).map_err(|e| AppError::invalid_date(e.to_string()))?;

    serde_json::from_value(value)
        .map_err(|e| AppError::invalid_request_with("Bad request", e.to_string()))
}

/// `GET /books` — list every book.
pub async fn list_books(State(db): State<Db>) -> Result<Response, AppError> {
    let books = Book::list_all(&db).await?;
    Ok(response::success(
        RESOURCE,
        books,
        "Books retrieved successfully",
        StatusCode::OK,
    ))
}

/// `GET /books/{id}` — fetch one book, wrapped as a one-element list.
pub async fn get_book(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_book_id(&raw_id)?;
    let book = Book::find_by_id(&db, id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    Ok(response::success(
        RESOURCE,
        vec![book],
        "Books retrieved successfully",
        StatusCode::OK,
    ))
}

/// `POST /books` — create a book; timestamps are stamped by the database.
pub async fn create_book(
    State(db): State<Db>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let payload = validated_payload(body)?;
    let book = Book::insert(&db, &payload).await?;
    Ok(response::success(
        RESOURCE,
        vec![book],
        "Book added successfully",
        StatusCode::CREATED,
    ))
}

/// `PUT /books/{id}` — overwrite the stored fields in place, refreshing
/// `updated_at`. The body is validated exactly like POST.
pub async fn update_book(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_book_id(&raw_id)?;

    let mut tx = db.begin().await?;
    Book::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    let payload = validated_payload(body)?;
    let book = Book::update(&mut *tx, id, &payload).await?;
    tx.commit().await?;

    Ok(response::success(
        RESOURCE,
        vec![book],
        "Book updated successfully",
        StatusCode::OK,
    ))
}

/// `DELETE /books/{id}`.
pub async fn delete_book(
    State(db): State<Db>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_book_id(&raw_id)?;

    let mut tx = db.begin().await?;
    Book::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| book_not_found(id))?;
    Book::delete(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(response::no_content())
}

#[cfg(test)]
mod tests {
    use super::super::BooksModule;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
        response::Response,
        Router,
    };
    use catalog_kernel::Module;
    use serde_json::{json, Value};
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        for migration in BooksModule.migrations() {
            sqlx::raw_sql(migration.up)
                .execute(&pool)
                .await
                .expect("migration");
        }
        BooksModule.routes().with_state(pool)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn bare_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn sample_payload(title: &str) -> Value {
        json!({
            "title": title,
            "author": "Author 4",
            "genre": "Fiction",
            "publication_date": "2024-10-31",
            "availability_status": "returned",
            "edition": "1st Edition",
            "summary": "x",
            "description": "x",
        })
    }

    async fn create_book(app: &Router, title: &str) -> Value {
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/books", &sample_payload(title)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn created_book_echoes_every_field_with_timestamps() {
        let app = test_router().await;
        let body = create_book(&app, "Book 4").await;

        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Book added successfully");
        let book = &body["data"]["books"][0];
        assert_eq!(book["title"], "Book 4");
        assert_eq!(book["author"], "Author 4");
        assert_eq!(book["genre"], "Fiction");
        assert_eq!(book["publication_date"], "2024-10-31");
        assert_eq!(book["availability_status"], "returned");
        assert_eq!(book["edition"], "1st Edition");
        assert!(!book["created_at"].as_str().unwrap_or("").is_empty());
        assert!(!book["updated_at"].as_str().unwrap_or("").is_empty());
    }

    #[tokio::test]
    async fn created_book_round_trips_through_get() {
        let app = test_router().await;
        let created = create_book(&app, "Book 4").await;
        let id = created["data"]["books"][0]["id"].as_i64().expect("id");

        let response = app
            .oneshot(bare_request(Method::GET, &format!("/books/{id}")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"]["books"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"]["books"][0]["title"], "Book 4");
    }

    #[tokio::test]
    async fn list_returns_every_book() {
        let app = test_router().await;
        for title in ["Book 1", "Book 2", "Book 3"] {
            create_book(&app, title).await;
        }

        let response = app
            .oneshot(bare_request(Method::GET, "/books"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Books retrieved successfully");
        assert_eq!(body["data"]["books"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn missing_fields_are_listed_in_the_error() {
        let app = test_router().await;
        let mut payload = sample_payload("Book 4");
        payload.as_object_mut().expect("object").remove("author");
        payload.as_object_mut().expect("object").remove("summary");

        let response = app
            .oneshot(json_request(Method::POST, "/books", &payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing required field");
        let details = body["error"]["details"].as_str().expect("details");
        assert!(details.contains("author"));
        assert!(details.contains("summary"));
    }

    #[tokio::test]
    async fn malformed_publication_date_is_a_distinct_error() {
        let app = test_router().await;
        let mut payload = sample_payload("Book 4");
        payload["publication_date"] = json!("31-10-2024");

        let response = app
            .oneshot(json_request(Method::POST, "/books", &payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid date format");
        assert!(body["error"]["details"].as_str().is_some());
    }

    #[tokio::test]
    async fn malformed_publication_date_on_update_is_rejected() {
        let app = test_router().await;
        let created = create_book(&app, "Book 4").await;
        let id = created["data"]["books"][0]["id"].as_i64().expect("id");

        let mut payload = sample_payload("Book 4 (revised)");
        payload["publication_date"] = json!("31-10-2024");

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, &format!("/books/{id}"), &payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid date format");

        let lookup = app
            .oneshot(bare_request(Method::GET, &format!("/books/{id}")))
            .await
            .expect("response");
        let body = body_json(lookup).await;
        assert_eq!(body["data"]["books"][0]["title"], "Book 4");
        assert_eq!(body["data"]["books"][0]["publication_date"], "2024-10-31");
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let app = test_router().await;

        let response = app
            .oneshot(bare_request(Method::GET, "/books/0"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Book not found");
        assert_eq!(
            body["error"]["details"],
            "No book was found for the given id(0)"
        );
    }

    #[tokio::test]
    async fn non_numeric_id_is_400_not_404() {
        let app = test_router().await;

        for request in [
            bare_request(Method::GET, "/books/invalid_id"),
            bare_request(Method::DELETE, "/books/invalid_id"),
        ] {
            let response = app.clone().oneshot(request).await.expect("response");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = body_json(response).await;
            assert_eq!(body["error"]["details"], "Invalid book id");
        }
    }

    #[tokio::test]
    async fn update_overwrites_in_place() {
        let app = test_router().await;
        let created = create_book(&app, "Book 1").await;
        let id = created["data"]["books"][0]["id"].as_i64().expect("id");
        let created_at = created["data"]["books"][0]["created_at"].clone();

        let mut payload = sample_payload("Book 1 (revised)");
        payload["availability_status"] = json!("borrowed");

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, &format!("/books/{id}"), &payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Book updated successfully");
        let book = &body["data"]["books"][0];
        assert_eq!(book["id"].as_i64(), Some(id));
        assert_eq!(book["title"], "Book 1 (revised)");
        assert_eq!(book["availability_status"], "borrowed");
        assert_eq!(book["created_at"], created_at);

        // Update in place: the collection must not have grown.
        let list = app
            .oneshot(bare_request(Method::GET, "/books"))
            .await
            .expect("response");
        let list = body_json(list).await;
        assert_eq!(list["data"]["books"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn invalid_update_never_mutates_stored_state() {
        let app = test_router().await;
        let created = create_book(&app, "Book 1").await;
        let id = created["data"]["books"][0]["id"].as_i64().expect("id");

        let mut payload = sample_payload("Changed title");
        payload.as_object_mut().expect("object").remove("genre");

        let response = app
            .clone()
            .oneshot(json_request(Method::PUT, &format!("/books/{id}"), &payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let lookup = app
            .oneshot(bare_request(Method::GET, &format!("/books/{id}")))
            .await
            .expect("response");
        let body = body_json(lookup).await;
        assert_eq!(body["data"]["books"][0]["title"], "Book 1");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_404() {
        let app = test_router().await;

        let response = app
            .oneshot(json_request(
                Method::PUT,
                "/books/42",
                &sample_payload("Book 42"),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_then_get_yields_404() {
        let app = test_router().await;
        let created = create_book(&app, "Book 1").await;
        let id = created["data"]["books"][0]["id"].as_i64().expect("id");

        let deleted = app
            .clone()
            .oneshot(bare_request(Method::DELETE, &format!("/books/{id}")))
            .await
            .expect("response");
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let lookup = app
            .oneshot(bare_request(Method::GET, &format!("/books/{id}")))
            .await
            .expect("response");
        assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unparseable_json_body_is_400() {
        let app = test_router().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Bad request");
    }
}
