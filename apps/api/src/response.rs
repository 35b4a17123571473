//! # レスポンスの組み立て
//!
//! プリフライト以外のレスポンスには必ず `Content-Type: application/json` と
//! `Access-Control-Allow-Origin: *` を付ける。

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;
use serde_json::json;

use crate::{error::RouterError, event::HttpResponse};

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const CONTENT_TYPE: &str = "Content-Type";

/// プリフライトのキャッシュ期間（24 時間）
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 86_400;

fn headers<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
   pairs
      .into_iter()
      .map(|(name, value)| (name.to_string(), value))
      .collect()
}

/// `OPTIONS` への応答（ボディは空）
pub fn preflight() -> HttpResponse {
   HttpResponse {
      status_code:       StatusCode::OK.as_u16(),
      headers:           headers([
         (ALLOW_ORIGIN, "*".to_string()),
         (ALLOW_METHODS, "GET, POST, PUT, DELETE, OPTIONS".to_string()),
         (ALLOW_HEADERS, "Content-Type".to_string()),
         (MAX_AGE, PREFLIGHT_MAX_AGE_SECS.to_string()),
      ]),
      body:              String::new(),
      is_base64_encoded: false,
   }
}

/// JSON ボディのレスポンス
pub fn json<T: Serialize + ?Sized>(status: StatusCode, payload: &T) -> Result<HttpResponse, RouterError> {
   let body = serde_json::to_string(payload).map_err(RouterError::Encode)?;
   Ok(HttpResponse {
      status_code: status.as_u16(),
      headers: headers([
         (CONTENT_TYPE, "application/json".to_string()),
         (ALLOW_ORIGIN, "*".to_string()),
      ]),
      body,
      is_base64_encoded: false,
   })
}

/// 200 `{"message": ...}`
pub fn message(message: &str) -> Result<HttpResponse, RouterError> {
   json(StatusCode::OK, &json!({ "message": message }))
}

/// 405 `{"error": "Method not allowed"}`
pub fn method_not_allowed() -> Result<HttpResponse, RouterError> {
   json(
      StatusCode::METHOD_NOT_ALLOWED,
      &json!({ "error": "Method not allowed" }),
   )
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_プリフライトはcorsヘッダのみで空ボディ() {
      let response = preflight();

      assert_eq!(response.status_code, 200);
      assert_eq!(response.body, "");
      assert!(!response.is_base64_encoded);
      assert_eq!(response.header(ALLOW_ORIGIN), Some("*"));
      assert_eq!(
         response.header(ALLOW_METHODS),
         Some("GET, POST, PUT, DELETE, OPTIONS")
      );
      assert_eq!(response.header(ALLOW_HEADERS), Some("Content-Type"));
      assert_eq!(response.header(MAX_AGE), Some("86400"));
      assert_eq!(response.header(CONTENT_TYPE), None);
   }

   #[test]
   fn test_jsonレスポンスはcontent_typeとallow_originを持つ() {
      let response = message("Goal updated").unwrap();

      assert_eq!(response.status_code, 200);
      assert_eq!(response.header(CONTENT_TYPE), Some("application/json"));
      assert_eq!(response.header(ALLOW_ORIGIN), Some("*"));
      assert_eq!(response.body, r#"{"message":"Goal updated"}"#);
   }

   #[test]
   fn test_method_not_allowedは405とエラーボディ() {
      let response = method_not_allowed().unwrap();

      assert_eq!(response.status_code, 405);
      assert_eq!(
         response.json_body().unwrap(),
         json!({ "error": "Method not allowed" })
      );
      assert_eq!(response.header(ALLOW_ORIGIN), Some("*"));
   }
}
