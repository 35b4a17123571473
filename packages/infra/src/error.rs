//! # インフラ層エラー
//!
//! セッションの開閉、コミット、目標・タスクのクエリで起きた失敗はすべて
//! [`InfraError`] になり、api 層で 500 に変換される。
//!
//! 生成時に [`SpanTrace`] を取るので、`update_progress` や `find_by_date` など
//! どのリポジトリ操作の中で失敗したかがログに残る。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// sqlx が返したエラー（接続拒否、SQL エラーなど）
   #[error("データベースエラー: {0}")]
   Database(#[source] sqlx::Error),

   /// RETURNING が行を返さない、モックへの障害注入など
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Database(source),
         span_trace: SpanTrace::capture(),
      }
   }
}
