use actix_web::HttpResponse;
use serde::Serialize;

use crate::models::dto::response::ApiResponse;

/// 200 with `{data, message}`.
pub fn success_json<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(data, message))
}

/// 201 with `{data, message}`.
pub fn created_json<T: Serialize>(data: T, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::new(data, message))
}

/// 200 carrying only a message.
pub fn message(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(serde_json::Value::Null, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[actix_web::test]
    async fn test_success_json_wraps_data() {
        let response = success_json(vec![1, 2], "ok");
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["data"], serde_json::json!([1, 2]));
        assert_eq!(value["message"], "ok");
    }

    #[test]
    fn test_created_json() {
        let response = created_json("x", "Created");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn test_message_has_null_data() {
        let body = to_bytes(message("Deleted").into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(value["data"].is_null());
        assert_eq!(value["message"], "Deleted");
    }
}
