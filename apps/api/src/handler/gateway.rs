//! # ゲートウェイハンドラ
//!
//! `GET /health`・`GET /health/ready` 以外のすべてのリクエストを受ける axum の fallback。
//! HTTP リクエストを [`HttpEvent`] に詰め替えて [`RequestRouter`] に渡し、
//! 返ってきた [`HttpResponse`] を HTTP レスポンスに戻す。
//!
//! パスは見ない。振り分けはメソッドとクエリ／ボディの論理エンドポイント名だけで行う。
//!
//! リクエスト ID は `x-request-id` ヘッダから取り、無ければ生成する。
//! どちらの場合もレスポンスの `x-request-id` に載せて返す。

use std::{collections::HashMap, sync::Arc};

use axum::{
   body::Body,
   extract::{Query, State},
   http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
   response::Response,
};
use planner_infra::{
   SessionManager,
   repository::{GoalRepository, TaskRepository},
};
use planner_shared::RequestId;

use crate::{
   error::RouterError,
   event::{HttpEvent, HttpResponse, RequestContext},
   router::RequestRouter,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// fallback ハンドラ
pub async fn gateway<S, G, T>(
   State(router): State<Arc<RequestRouter<S, G, T>>>,
   method: Method,
   Query(query): Query<HashMap<String, String>>,
   headers: HeaderMap,
   body: String,
) -> Result<Response, RouterError>
where
   S: SessionManager + 'static,
   G: GoalRepository + 'static,
   T: TaskRepository + 'static,
{
   let request_id = headers
      .get(REQUEST_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .filter(|v| !v.is_empty())
      .map(RequestId::from_string)
      .unwrap_or_default();

   let event = HttpEvent {
      http_method:             method.as_str().to_string(),
      query_string_parameters: (!query.is_empty()).then_some(query),
      body:                    (!body.is_empty()).then_some(body),
      headers:                 Some(header_map(&headers)),
   };
   let context = RequestContext::new(request_id.clone());

   let response = router.handle(&event, &context).await?;

   Ok(into_http(response, &request_id))
}

/// ヘッダを文字列マップにする（ASCII で表せない値は捨てる）
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
   headers
      .iter()
      .filter_map(|(name, value)| {
         value
            .to_str()
            .ok()
            .map(|v| (name.as_str().to_string(), v.to_string()))
      })
      .collect()
}

fn into_http(response: HttpResponse, request_id: &RequestId) -> Response {
   let status =
      StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

   let mut http = Response::new(Body::from(response.body));
   *http.status_mut() = status;

   let headers = http.headers_mut();
   for (name, value) in &response.headers {
      match (
         HeaderName::try_from(name.as_str()),
         HeaderValue::try_from(value.as_str()),
      ) {
         (Ok(name), Ok(value)) => {
            headers.insert(name, value);
         }
         _ => tracing::warn!(header = %name, "不正なレスポンスヘッダを無視しました"),
      }
   }
   if let Ok(value) = HeaderValue::try_from(request_id.as_str()) {
      headers.insert(REQUEST_ID_HEADER, value);
   }

   http
}

#[cfg(test)]
mod tests {
   use std::collections::BTreeMap;

   use axum::body::to_bytes;
   use pretty_assertions::assert_eq;

   use super::*;

   #[tokio::test]
   async fn test_into_httpはステータスとヘッダとボディを写す() {
      let response = HttpResponse {
         status_code:       405,
         headers:           BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
         ]),
         body:              r#"{"error":"Method not allowed"}"#.to_string(),
         is_base64_encoded: false,
      };

      let http = into_http(response, &RequestId::from_string("req-1"));

      assert_eq!(http.status(), StatusCode::METHOD_NOT_ALLOWED);
      assert_eq!(http.headers()["content-type"], "application/json");
      assert_eq!(http.headers()["access-control-allow-origin"], "*");
      assert_eq!(http.headers()[REQUEST_ID_HEADER], "req-1");

      let bytes = to_bytes(http.into_body(), usize::MAX).await.unwrap();
      assert_eq!(&bytes[..], br#"{"error":"Method not allowed"}"#);
   }

   #[test]
   fn test_header_mapはヘッダ名をキーにする() {
      let mut headers = HeaderMap::new();
      headers.insert("content-type", HeaderValue::from_static("application/json"));

      let map = header_map(&headers);

      assert_eq!(
         map.get("content-type").map(String::as_str),
         Some("application/json")
      );
   }
}
