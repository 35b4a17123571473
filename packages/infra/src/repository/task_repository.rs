//! # TaskRepository
//!
//! 当日タスク（`tasks` テーブル）の永続化を担当するリポジトリ。
//!
//! 一覧は `task_date` の完全一致で絞り込む。「今日」は呼び出し側が
//! [`Clock`](planner_domain::clock::Clock) から決めて渡す。

use async_trait::async_trait;
use chrono::NaiveDate;
use planner_domain::task::{NewTask, Task, TaskId};

use crate::{
   db::{DbSession, TxContext},
   error::InfraError,
};

/// タスクリポジトリトレイト
#[async_trait]
pub trait TaskRepository: Send + Sync {
   /// 指定日のタスクを ID 昇順で取得する
   async fn find_by_date(
      &self,
      session: &mut DbSession,
      task_date: NaiveDate,
   ) -> Result<Vec<Task>, InfraError>;

   /// タスクを挿入し、採番された ID を返す（`completed = false`）
   async fn insert(&self, tx: &mut TxContext<'_>, new_task: &NewTask) -> Result<TaskId, InfraError>;

   /// 完了フラグを更新する
   ///
   /// `completed` が `None` の場合も NULL として書き込む。
   async fn update_completed(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<TaskId>,
      completed: Option<bool>,
   ) -> Result<(), InfraError>;
}

/// `tasks` テーブルの行（`task_date` は読み出さない）
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
   id:        i64,
   title:     Option<String>,
   time:      Option<String>,
   completed: Option<bool>,
}

impl From<TaskRow> for Task {
   fn from(row: TaskRow) -> Self {
      Task::from_db(TaskId::from_i64(row.id), row.title, row.time, row.completed)
   }
}

/// PostgreSQL 実装の TaskRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresTaskRepository;

impl PostgresTaskRepository {
   pub fn new() -> Self {
      Self
   }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%task_date))]
   async fn find_by_date(
      &self,
      session: &mut DbSession,
      task_date: NaiveDate,
   ) -> Result<Vec<Task>, InfraError> {
      let rows = sqlx::query_as::<_, TaskRow>(
         r#"
         SELECT id::bigint AS id, title, time, completed
         FROM tasks
         WHERE task_date = $1
         ORDER BY id
         "#,
      )
      .bind(task_date)
      .fetch_all(session.conn()?)
      .await?;

      Ok(rows.into_iter().map(Task::from).collect())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(task_date = %new_task.task_date))]
   async fn insert(&self, tx: &mut TxContext<'_>, new_task: &NewTask) -> Result<TaskId, InfraError> {
      let id: i64 = sqlx::query_scalar(
         r#"
         INSERT INTO tasks (title, time, completed, task_date)
         VALUES ($1, $2, false, $3)
         RETURNING id::bigint
         "#,
      )
      .bind(new_task.title.as_deref())
      .bind(new_task.time.as_deref())
      .bind(new_task.task_date)
      .fetch_one(tx.conn()?)
      .await?;

      Ok(TaskId::from_i64(id))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = ?id, completed = ?completed))]
   async fn update_completed(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<TaskId>,
      completed: Option<bool>,
   ) -> Result<(), InfraError> {
      sqlx::query("UPDATE tasks SET completed = $1 WHERE id = $2")
         .bind(completed)
         .bind(id.map(|id| id.as_i64()))
         .execute(tx.conn()?)
         .await?;

      Ok(())
   }
}
