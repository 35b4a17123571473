//! # RequestRouter
//!
//! 1 件のイベントを 1 件のレスポンスに変換する。
//!
//! ## 処理の流れ
//!
//! ```text
//! OPTIONS ──────────────────────────────────────────▶ preflight（DB なし）
//! その他  ─▶ open ─▶ decode ─▶ 1 回の SQL ─▶ commit ─▶ close ─▶ response
//!                      │            │           │
//!                      └────────────┴───────────┴── Err でも close してから返す
//! ```
//!
//! - セッションはリクエストごとに開き、成否にかかわらず閉じる
//! - 書き込みは書き込み直後にコミットし、その後でレスポンスを組み立てる
//! - 障害は捕捉せず [`RouterError`] として返す（リトライなし）

use std::sync::Arc;

use axum::http::StatusCode;
use planner_domain::{
   clock::Clock,
   goal::{Goal, NewGoal},
   task::{NewTask, Task},
};
use planner_infra::{
   DbSession,
   PgSessionManager,
   SessionManager,
   repository::{GoalRepository, PostgresGoalRepository, PostgresTaskRepository, TaskRepository},
};
use serde::Serialize;

use crate::{
   config::DatabaseConfig,
   error::RouterError,
   event::{HttpEvent, HttpResponse, RequestContext},
   response,
   route::Route,
};

#[derive(Serialize)]
struct GoalList<'a> {
   goals: &'a [Goal],
}

#[derive(Serialize)]
struct TaskList<'a> {
   tasks: &'a [Task],
}

#[derive(Serialize)]
struct Created<I> {
   id:      I,
   message: &'static str,
}

/// リクエストルーター
///
/// リクエスト間で状態を持たない。保持するのはセッションの開き方と
/// リポジトリ、日付の取得元だけ。
pub struct RequestRouter<S, G, T> {
   sessions:  S,
   goal_repo: G,
   task_repo: T,
   clock:     Arc<dyn Clock>,
}

impl RequestRouter<PgSessionManager, PostgresGoalRepository, PostgresTaskRepository> {
   /// PostgreSQL 構成のルーターを作る
   pub fn from_config(config: &DatabaseConfig, clock: Arc<dyn Clock>) -> Self {
      Self::new(
         PgSessionManager::new(config.url.clone()),
         PostgresGoalRepository::new(),
         PostgresTaskRepository::new(),
         clock,
      )
   }
}

impl<S, G, T> RequestRouter<S, G, T>
where
   S: SessionManager,
   G: GoalRepository,
   T: TaskRepository,
{
   pub fn new(sessions: S, goal_repo: G, task_repo: T, clock: Arc<dyn Clock>) -> Self {
      Self {
         sessions,
         goal_repo,
         task_repo,
         clock,
      }
   }

   /// イベントを処理する
   ///
   /// `Err` が返るのは障害のときだけ。その場合もセッションは閉じ済み。
   #[tracing::instrument(
      skip_all,
      fields(
         request_id = %context.request_id,
         method = %event.http_method,
         route = tracing::field::Empty
      )
   )]
   pub async fn handle(
      &self,
      event: &HttpEvent,
      context: &RequestContext,
   ) -> Result<HttpResponse, RouterError> {
      if event.http_method == "OPTIONS" {
         return Ok(response::preflight());
      }

      let mut session = self.sessions.open().await?;
      let result = self.dispatch(&mut session, event).await;
      let closed = session.close().await;

      match (result, closed) {
         (Ok(response), Ok(())) => Ok(response),
         (Ok(_), Err(e)) => Err(e.into()),
         (Err(e), closed) => {
            if let Err(close_error) = closed {
               tracing::warn!(error = %close_error, "セッションのクローズに失敗しました");
            }
            Err(e)
         }
      }
   }

   async fn dispatch(
      &self,
      session: &mut DbSession,
      event: &HttpEvent,
   ) -> Result<HttpResponse, RouterError> {
      let route = Route::decode(event)?;
      tracing::Span::current().record("route", route.name());

      match route {
         Route::ListGoals => {
            let goals = self.goal_repo.find_all(session).await?;
            response::json(StatusCode::OK, &GoalList { goals: &goals })
         }
         Route::ListTasks => {
            let tasks = self
               .task_repo
               .find_by_date(session, self.clock.today())
               .await?;
            response::json(StatusCode::OK, &TaskList { tasks: &tasks })
         }
         Route::AddGoal(body) => {
            let new_goal = NewGoal {
               title:    body.title,
               category: body.category,
            };
            let mut tx = session.begin().await?;
            let id = self.goal_repo.insert(&mut tx, &new_goal).await?;
            tx.commit().await?;
            tracing::debug!(goal_id = %id, "目標を追加しました");
            response::json(
               StatusCode::OK,
               &Created {
                  id,
                  message: "Goal added",
               },
            )
         }
         Route::AddTask(body) => {
            let new_task = NewTask {
               title:     body.title,
               time:      body.time,
               task_date: self.clock.today(),
            };
            let mut tx = session.begin().await?;
            let id = self.task_repo.insert(&mut tx, &new_task).await?;
            tx.commit().await?;
            tracing::debug!(task_id = %id, "タスクを追加しました");
            response::json(
               StatusCode::OK,
               &Created {
                  id,
                  message: "Task added",
               },
            )
         }
         Route::UpdateGoal(body) => {
            let mut tx = session.begin().await?;
            if let Some(completed) = body.completed {
               self
                  .goal_repo
                  .update_completed(&mut tx, body.id, completed)
                  .await?;
            }
            if let Some(progress) = body.progress {
               self
                  .goal_repo
                  .update_progress(&mut tx, body.id, progress)
                  .await?;
            }
            tx.commit().await?;
            response::message("Goal updated")
         }
         Route::UpdateTask(body) => {
            let mut tx = session.begin().await?;
            self
               .task_repo
               .update_completed(&mut tx, body.id, body.completed)
               .await?;
            tx.commit().await?;
            response::message("Task updated")
         }
         Route::Unsupported => response::method_not_allowed(),
      }
   }
}
