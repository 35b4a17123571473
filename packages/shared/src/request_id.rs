//! # リクエスト識別子
//!
//! 呼び出し元ランタイムがリクエストごとに付与する識別子。
//! ハンドラのロジックでは使用せず、ログのスパンに載せてリクエストを追跡するためだけに使う。
//!
//! ## 設計判断
//!
//! - **Newtype パターン**: `String` をラップし、タイトルやカテゴリなどの文字列と混同させない
//! - **UUID v7 採用**: 呼び出し元が ID を渡さなかった場合に生成する。時系列でソート可能
//! - **文字列表現**: `x-request-id` ヘッダや API Gateway の `requestId` をそのまま保持する
//!
//! ## 使用例
//!
//! ```rust
//! use planner_shared::RequestId;
//!
//! // ヘッダが無い場合は新規生成
//! let id = RequestId::new();
//! assert!(!id.as_str().is_empty());
//!
//! // ヘッダから受け取った値で作成
//! let id = RequestId::from_string("req-123");
//! assert_eq!(id.to_string(), "req-123");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// リクエスト追跡用の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
   /// 新しいリクエスト ID を生成する（UUID v7）
   pub fn new() -> Self {
      Self(Uuid::now_v7().to_string())
   }

   /// 外部から受け取った文字列でリクエスト ID を作成する
   pub fn from_string(s: impl Into<String>) -> Self {
      Self(s.into())
   }

   /// 内部の文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl Default for RequestId {
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Display for RequestId {
   /// `tracing` マクロの `%` フォーマッタで使用される。
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "{}", self.0)
   }
}
