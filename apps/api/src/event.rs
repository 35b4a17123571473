//! # リクエスト／レスポンス記述子
//!
//! 呼び出し元ランタイムとの境界で受け渡す HTTP 形式のイベント。
//! フィールド名はランタイムの JSON 表現（camelCase）に合わせる。
//!
//! ```json
//! {
//!   "httpMethod": "GET",
//!   "queryStringParameters": { "endpoint": "tasks" },
//!   "body": null,
//!   "headers": { "content-type": "application/json" }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use planner_shared::RequestId;
use serde::{Deserialize, Serialize};

fn default_method() -> String {
   "GET".to_string()
}

/// 受信イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
   /// HTTP メソッド。省略時は `GET`
   #[serde(default = "default_method")]
   pub http_method:             String,
   #[serde(default)]
   pub query_string_parameters: Option<HashMap<String, String>>,
   /// JSON 文字列のままのボディ
   #[serde(default)]
   pub body:                    Option<String>,
   #[serde(default)]
   pub headers:                 Option<HashMap<String, String>>,
}

impl HttpEvent {
   pub fn new(http_method: impl Into<String>) -> Self {
      Self {
         http_method:             http_method.into(),
         query_string_parameters: None,
         body:                    None,
         headers:                 None,
      }
   }

   pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
      self
         .query_string_parameters
         .get_or_insert_with(HashMap::new)
         .insert(key.into(), value.into());
      self
   }

   pub fn with_body(mut self, body: impl Into<String>) -> Self {
      self.body = Some(body.into());
      self
   }

   /// クエリパラメータを 1 つ取り出す
   pub fn query(&self, key: &str) -> Option<&str> {
      self
         .query_string_parameters
         .as_ref()
         .and_then(|params| params.get(key))
         .map(String::as_str)
   }
}

/// 呼び出しコンテキスト
///
/// `request_id` はログのスパンにだけ載せ、処理内容には影響しない。
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
   pub request_id: RequestId,
}

impl RequestContext {
   pub fn new(request_id: RequestId) -> Self {
      Self { request_id }
   }
}

/// 応答イベント
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
   pub status_code:       u16,
   pub headers:           BTreeMap<String, String>,
   /// 空文字列（プリフライト）または JSON テキスト
   pub body:              String,
   /// 常に `false`
   pub is_base64_encoded: bool,
}

impl HttpResponse {
   pub fn header(&self, name: &str) -> Option<&str> {
      self.headers.get(name).map(String::as_str)
   }

   /// ボディを JSON として読み直す（テスト・ログ用）
   pub fn json_body(&self) -> Result<serde_json::Value, serde_json::Error> {
      serde_json::from_str(&self.body)
   }
}
