//! Uniform response envelope for the catalog API.
//!
//! Every JSON body has the shape `{status, message, http_code, data?, error?}`.
//! `data` wraps the records as a list under the resource's plural key, even
//! for single-record responses; a lone record rides as a one-element list.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Build a success response carrying `records` under `data.{resource}`.
pub fn success<T: Serialize>(
    resource: &str,
    records: Vec<T>,
    message: &str,
    code: StatusCode,
) -> Response {
    let body = json!({
        "status": "success",
        "message": message,
        "http_code": code.as_u16(),
        "data": { resource: records },
    });
    (code, Json(body)).into_response()
}

/// Build a success response with no `data` key.
pub fn success_message(message: &str, code: StatusCode) -> Response {
    let body = json!({
        "status": "success",
        "message": message,
        "http_code": code.as_u16(),
    });
    (code, Json(body)).into_response()
}

/// Bare 204 for successful deletes; a no-content response carries no envelope.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Envelope body for an error response.
pub(crate) fn error_body(message: &str, code: StatusCode, details: Option<String>) -> Value {
    let mut body = json!({
        "status": "error",
        "message": message,
        "http_code": code.as_u16(),
    });
    if let Some(details) = details {
        body["error"] = json!({ "details": details });
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[derive(Serialize)]
    struct Rec {
        id: i64,
        name: &'static str,
    }

    #[tokio::test]
    async fn single_record_wraps_as_one_element_list() {
        let response = success(
            "products",
            vec![Rec {
                id: 1,
                name: "widget",
            }],
            "product retrieved successfully",
            StatusCode::OK,
        );
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["http_code"], 200);
        assert_eq!(body["data"]["products"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"]["products"][0]["name"], "widget");
    }

    #[tokio::test]
    async fn message_only_envelope_has_no_data() {
        let response = success_message("product has been updated", StatusCode::OK);
        let body = body_json(response).await;
        assert!(body.get("data").is_none());
        assert_eq!(body["message"], "product has been updated");
    }

    #[tokio::test]
    async fn no_content_is_bodyless() {
        let response = no_content();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        assert!(bytes.is_empty());
    }

    #[test]
    fn error_body_includes_details_only_when_present() {
        let with = error_body("Bad request", StatusCode::BAD_REQUEST, Some("Invalid book id".into()));
        assert_eq!(with["error"]["details"], "Invalid book id");
        assert_eq!(with["http_code"], 400);

        let without = error_body("product already exists", StatusCode::CONFLICT, None);
        assert!(without.get("error").is_none());
    }
}
