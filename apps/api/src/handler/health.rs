//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health        # Liveness: プロセスが応答できるか
//! GET /health/ready  # Readiness: データベースに接続できるか
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! { "status": "ready", "checks": { "database": "ok" } }
//! ```

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use planner_infra::{InfraError, SessionManager};
use planner_shared::{CheckStatus, DATABASE_CHECK, HealthResponse, ReadinessResponse};

/// データベースチェックのタイムアウト
const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Readiness Check 用の State
pub struct ReadinessState {
   pub sessions: Arc<dyn SessionManager>,
}

/// ヘルスチェックエンドポイント
///
/// データベースには触れず、常に 200 OK を返す。
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check エンドポイント
///
/// セッションを 1 本開いて `SELECT 1` を実行し、閉じる。
/// 成功 → 200、失敗またはタイムアウト → 503。
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let database = check_database(state.sessions.as_ref()).await;
   let response = ReadinessResponse::from_checks([(DATABASE_CHECK, database)]);

   let http_status = if response.is_ready() {
      StatusCode::OK
   } else {
      StatusCode::SERVICE_UNAVAILABLE
   };

   (http_status, Json(response))
}

async fn check_database(sessions: &dyn SessionManager) -> CheckStatus {
   match tokio::time::timeout(DATABASE_CHECK_TIMEOUT, ping(sessions)).await {
      Ok(Ok(())) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: database ping failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: database check timed out");
         CheckStatus::Error
      }
   }
}

async fn ping(sessions: &dyn SessionManager) -> Result<(), InfraError> {
   let mut session = sessions.open().await?;
   let pinged = session.ping().await;
   let closed = session.close().await;
   pinged.and(closed)
}
