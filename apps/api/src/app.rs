//! # アプリケーション構築
//!
//! `GET /health` と `GET /health/ready` だけを明示的に登録し、それ以外はすべて
//! [`gateway`] で [`RequestRouter`] に渡す。ヘルスチェックのパスでも
//! GET 以外のメソッドは `gateway` に届く。

use std::sync::Arc;

use axum::{Router, routing::get};
use planner_infra::{
   SessionManager,
   repository::{GoalRepository, TaskRepository},
};
use tower_http::trace::TraceLayer;

use crate::{
   handler::{ReadinessState, gateway, health_check, readiness_check},
   router::RequestRouter,
};

/// axum のルーターを組み立てる
pub fn build_app<S, G, T>(router: Arc<RequestRouter<S, G, T>>, readiness: Arc<ReadinessState>) -> Router
where
   S: SessionManager + 'static,
   G: GoalRepository + 'static,
   T: TaskRepository + 'static,
{
   Router::new()
      .route("/health", get(health_check))
      .route("/health/ready", get(readiness_check))
      .with_state(readiness)
      .fallback(gateway::<S, G, T>)
      .method_not_allowed_fallback(gateway::<S, G, T>)
      .with_state(router)
      .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
   use axum::{
      body::{Body, to_bytes},
      http::{Method, Request, StatusCode},
   };
   use chrono::NaiveDate;
   use planner_domain::clock::FixedClock;
   use planner_infra::mock::{MockGoalRepository, MockSessionManager, MockTaskRepository};
   use pretty_assertions::assert_eq;
   use serde_json::{Value, json};
   use tower::ServiceExt;

   use super::*;
   use crate::handler::REQUEST_ID_HEADER;

   fn create_test_app(sessions: MockSessionManager) -> Router {
      let router = RequestRouter::new(
         sessions.clone(),
         MockGoalRepository::new(),
         MockTaskRepository::new(),
         Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())),
      );
      let readiness = ReadinessState {
         sessions: Arc::new(sessions),
      };
      build_app(Arc::new(router), Arc::new(readiness))
   }

   fn request(method: Method, uri: &str, body: &str) -> Request<Body> {
      Request::builder()
         .method(method)
         .uri(uri)
         .header("content-type", "application/json")
         .body(Body::from(body.to_string()))
         .unwrap()
   }

   async fn json_body(response: axum::response::Response) -> Value {
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   #[tokio::test]
   async fn test_healthは200を返す() {
      let app = create_test_app(MockSessionManager::new());

      let response = app
         .oneshot(request(Method::GET, "/health", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(json_body(response).await["status"], "healthy");
   }

   #[tokio::test]
   async fn test_readinessはdbに接続できれば200() {
      let sessions = MockSessionManager::new();
      let app = create_test_app(sessions.clone());

      let response = app
         .oneshot(request(Method::GET, "/health/ready", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         json_body(response).await,
         json!({ "status": "ready", "checks": { "database": "ok" } })
      );
      assert_eq!(sessions.log().closed(), 1);
   }

   #[tokio::test]
   async fn test_readinessはdbに接続できなければ503() {
      let app = create_test_app(MockSessionManager::unavailable());

      let response = app
         .oneshot(request(Method::GET, "/health/ready", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
      assert_eq!(
         json_body(response).await,
         json!({ "status": "not_ready", "checks": { "database": "error" } })
      );
   }

   #[tokio::test]
   async fn test_追加した目標をクエリで一覧できる() {
      let app = create_test_app(MockSessionManager::new());

      let created = app
         .clone()
         .oneshot(request(
            Method::POST,
            "/",
            r#"{"action":"add_goal","title":"Learn Go","category":"skills"}"#,
         ))
         .await
         .unwrap();
      assert_eq!(created.status(), StatusCode::OK);
      assert_eq!(created.headers()["access-control-allow-origin"], "*");
      let id = json_body(created).await["id"].clone();

      let listed = app
         .oneshot(request(Method::GET, "/api?endpoint=goals", ""))
         .await
         .unwrap();

      assert_eq!(listed.status(), StatusCode::OK);
      assert_eq!(listed.headers()["content-type"], "application/json");
      assert_eq!(
         json_body(listed).await,
         json!({
            "goals": [{
               "id": id,
               "title": "Learn Go",
               "category": "skills",
               "progress": 0,
               "completed": false
            }]
         })
      );
   }

   #[tokio::test]
   async fn test_optionsはcorsヘッダと空ボディ() {
      let sessions = MockSessionManager::new();
      let app = create_test_app(sessions.clone());

      let response = app
         .oneshot(request(Method::OPTIONS, "/anything", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         response.headers()["access-control-allow-methods"],
         "GET, POST, PUT, DELETE, OPTIONS"
      );
      assert_eq!(response.headers()["access-control-max-age"], "86400");
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      assert!(bytes.is_empty());
      assert_eq!(sessions.log().opened(), 0);
   }

   #[tokio::test]
   async fn test_ヘルスチェックのパスへのoptionsもプリフライトになる() {
      let sessions = MockSessionManager::new();
      let app = create_test_app(sessions.clone());

      let response = app
         .oneshot(request(Method::OPTIONS, "/health", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(response.headers()["access-control-allow-origin"], "*");
      assert_eq!(
         response.headers()["access-control-allow-methods"],
         "GET, POST, PUT, DELETE, OPTIONS"
      );
      assert_eq!(sessions.log().opened(), 0);
   }

   #[tokio::test]
   async fn test_ヘルスチェックのパスへのpostも目標を追加する() {
      let sessions = MockSessionManager::new();
      let app = create_test_app(sessions.clone());

      let response = app
         .oneshot(request(
            Method::POST,
            "/health/ready",
            r#"{"action":"add_goal","title":"Run 5k"}"#,
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(response.headers()["access-control-allow-origin"], "*");
      assert_eq!(
         json_body(response).await["message"],
         "Goal added"
      );
      assert_eq!(sessions.log().closed(), 1);
   }

   #[tokio::test]
   async fn test_deleteは405() {
      let app = create_test_app(MockSessionManager::new());

      let response = app
         .oneshot(request(Method::DELETE, "/", ""))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
      assert_eq!(
         json_body(response).await,
         json!({ "error": "Method not allowed" })
      );
   }

   #[tokio::test]
   async fn test_壊れたボディは500のproblem_details() {
      let sessions = MockSessionManager::new();
      let app = create_test_app(sessions.clone());

      let response = app
         .oneshot(request(Method::PUT, "/", "{\"endpoint\":"))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(json_body(response).await["status"], 500);
      assert_eq!(sessions.log().closed(), 1);
   }

   #[tokio::test]
   async fn test_リクエストidはレスポンスヘッダに返る() {
      let app = create_test_app(MockSessionManager::new());
      let mut req = request(Method::GET, "/", "");
      req.headers_mut()
         .insert(REQUEST_ID_HEADER, "req-42".parse().unwrap());

      let response = app.oneshot(req).await.unwrap();

      assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
   }

   #[tokio::test]
   async fn test_リクエストidが無ければ生成される() {
      let app = create_test_app(MockSessionManager::new());

      let response = app
         .oneshot(request(Method::GET, "/", ""))
         .await
         .unwrap();

      assert!(!response.headers()[REQUEST_ID_HEADER].is_empty());
   }
}
