//! # `/health` 系のレスポンス
//!
//! Planner が依存する外部資源は PostgreSQL だけなので、readiness の
//! チェック項目も [`DATABASE_CHECK`] の 1 つになる。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// readiness のチェック名
pub const DATABASE_CHECK: &str = "database";

/// `GET /health` のボディ
#[derive(Debug, Serialize)]
pub struct HealthResponse {
   pub status:  String,
   /// 応答したバイナリのバージョン
   pub version: String,
}

impl HealthResponse {
   /// ```
   /// use planner_shared::HealthResponse;
   ///
   /// let response = HealthResponse::healthy("0.1.0");
   /// assert_eq!(response.status, "healthy");
   /// ```
   pub fn healthy(version: impl Into<String>) -> Self {
      Self {
         status:  "healthy".to_string(),
         version: version.into(),
      }
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
   Ok,
   Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
   Ready,
   NotReady,
}

/// `GET /health/ready` のボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
   pub status: ReadinessStatus,
   pub checks: BTreeMap<String, CheckStatus>,
}

impl ReadinessResponse {
   /// チェック結果から全体の状態を決める。1 つでも `Error` があれば `NotReady`。
   pub fn from_checks<'a>(checks: impl IntoIterator<Item = (&'a str, CheckStatus)>) -> Self {
      let checks: BTreeMap<String, CheckStatus> = checks
         .into_iter()
         .map(|(name, status)| (name.to_string(), status))
         .collect();
      let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
         ReadinessStatus::Ready
      } else {
         ReadinessStatus::NotReady
      };
      Self { status, checks }
   }

   pub fn is_ready(&self) -> bool {
      self.status == ReadinessStatus::Ready
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use serde_json::json;

   use super::*;

   #[test]
   fn test_healthyはバージョンを載せる() {
      let json = serde_json::to_value(HealthResponse::healthy("1.2.3")).unwrap();

      assert_eq!(json, json!({ "status": "healthy", "version": "1.2.3" }));
   }

   #[test]
   fn test_データベースが落ちていればnot_ready() {
      let response = ReadinessResponse::from_checks([(DATABASE_CHECK, CheckStatus::Error)]);

      assert!(!response.is_ready());
      assert_eq!(
         serde_json::to_value(&response).unwrap(),
         json!({ "status": "not_ready", "checks": { "database": "error" } })
      );
   }

   #[test]
   fn test_データベースに届けばready() {
      let response = ReadinessResponse::from_checks([(DATABASE_CHECK, CheckStatus::Ok)]);

      assert!(response.is_ready());
      assert_eq!(response.checks[DATABASE_CHECK], CheckStatus::Ok);
   }
}
