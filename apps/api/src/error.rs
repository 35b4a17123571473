//! # ルーターエラー
//!
//! [`RequestRouter`](crate::router::RequestRouter) が捕捉せずに呼び出し元へ返す障害。
//!
//! 未対応のメソッド・アクション・エンドポイントはエラーではなく
//! 405 レスポンスとして返す。ここに来るのはそれ以外の障害のみ:
//!
//! - ボディの JSON が壊れている、または型が合わない
//! - レスポンスのエンコード失敗
//! - 接続不可・SQL エラー・制約違反などのデータベース障害
//!
//! ルーター自身はリトライもログ出力もしない。HTTP アダプタが
//! RFC 7807 形式の 500 レスポンスに変換し、詳細はログにのみ残す。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use planner_infra::InfraError;
use serde::Serialize;
use thiserror::Error;

/// ルーターが伝播させる障害
#[derive(Debug, Error)]
pub enum RouterError {
   /// リクエストボディを解釈できない
   #[error("リクエストボディが不正です: {0}")]
   MalformedBody(#[source] serde_json::Error),

   /// レスポンスボディを JSON にできない
   #[error("レスポンスのエンコードに失敗しました: {0}")]
   Encode(#[source] serde_json::Error),

   /// 接続・クエリ・コミット・クローズの失敗
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),
}

/// RFC 7807 準拠のエラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
   #[serde(rename = "type")]
   pub error_type: String,
   pub title:      String,
   pub status:     u16,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub detail:     Option<String>,
}

impl ErrorResponse {
   fn internal() -> Self {
      Self {
         error_type: "about:blank".to_string(),
         title:      "Internal Server Error".to_string(),
         status:     StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
         detail:     None,
      }
   }
}

impl IntoResponse for RouterError {
   /// 種類にかかわらず 500 を返す
   ///
   /// エラー内容はクライアントに返さず、ログにのみ出力する。
   fn into_response(self) -> Response {
      match &self {
         RouterError::Database(e) => {
            tracing::error!(
               error = %e,
               span_trace = %e.span_trace(),
               "リクエスト処理中にデータベースエラーが発生しました"
            );
         }
         RouterError::MalformedBody(_) | RouterError::Encode(_) => {
            tracing::error!(error = %self, "リクエスト処理中に障害が発生しました");
         }
      }

      (
         StatusCode::INTERNAL_SERVER_ERROR,
         Json(ErrorResponse::internal()),
      )
         .into_response()
   }
}

#[cfg(test)]
mod tests {
   use axum::body::to_bytes;
   use pretty_assertions::assert_eq;
   use serde_json::{Value, json};

   use super::*;

   #[tokio::test]
   async fn test_malformed_bodyは500のproblem_detailsになる() {
      let source = serde_json::from_str::<Value>("{").unwrap_err();
      let response = RouterError::MalformedBody(source).into_response();

      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let body: Value = serde_json::from_slice(&bytes).unwrap();
      assert_eq!(
         body,
         json!({
            "type": "about:blank",
            "title": "Internal Server Error",
            "status": 500
         })
      );
   }

   #[tokio::test]
   async fn test_データベースエラーの詳細はレスポンスに含まれない() {
      let error = RouterError::from(InfraError::unexpected("password=secret"));
      let response = error.into_response();

      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let text = String::from_utf8(bytes.to_vec()).unwrap();
      assert!(!text.contains("secret"));
   }
}
