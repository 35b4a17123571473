//! TaskRepository 統合テスト
//!
//! 実行方法:
//! ```bash
//! DATABASE_URL=postgres://localhost/postgres \
//!    cargo test -p planner-infra --test task_repository_test -- --ignored
//! ```

mod common;

use common::{date, open_session};
use planner_domain::task::{DEFAULT_TASK_TIME, NewTask};
use planner_infra::repository::{PostgresTaskRepository, TaskRepository};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

fn new_task(title: &str, day: u32) -> NewTask {
   NewTask {
      title:     Some(title.to_string()),
      time:      Some(DEFAULT_TASK_TIME.to_string()),
      task_date: date(2026, 3, day),
   }
}

#[sqlx::test(migrations = false, fixtures("schema"))]
#[ignore = "PostgreSQL が必要"]
async fn test_一覧は指定日のタスクだけを返す(pool: PgPool) {
   let sut = PostgresTaskRepository::new();
   let mut session = open_session(&pool).await;

   let mut tx = session.begin().await.unwrap();
   let today = sut.insert(&mut tx, &new_task("today", 14)).await.unwrap();
   sut.insert(&mut tx, &new_task("yesterday", 13)).await.unwrap();
   tx.commit().await.unwrap();

   let tasks = sut.find_by_date(&mut session, date(2026, 3, 14)).await.unwrap();
   session.close().await.unwrap();

   assert_eq!(tasks.len(), 1);
   assert_eq!(tasks[0].id(), today);
   assert_eq!(tasks[0].title(), Some("today"));
   assert_eq!(tasks[0].time(), Some("12:00"));
   assert_eq!(tasks[0].completed(), Some(false));
}

#[sqlx::test(migrations = false, fixtures("schema"))]
#[ignore = "PostgreSQL が必要"]
async fn test_完了フラグにはnullも書き込まれる(pool: PgPool) {
   let sut = PostgresTaskRepository::new();
   let mut session = open_session(&pool).await;

   let mut tx = session.begin().await.unwrap();
   let id = sut.insert(&mut tx, &new_task("x", 14)).await.unwrap();
   sut.update_completed(&mut tx, Some(id), Some(true)).await.unwrap();
   tx.commit().await.unwrap();

   let task = sut.find_by_date(&mut session, date(2026, 3, 14)).await.unwrap().remove(0);
   assert_eq!(task.completed(), Some(true));

   let mut tx = session.begin().await.unwrap();
   sut.update_completed(&mut tx, Some(id), None).await.unwrap();
   tx.commit().await.unwrap();

   let task = sut.find_by_date(&mut session, date(2026, 3, 14)).await.unwrap().remove(0);
   assert_eq!(task.completed(), None);
}

#[sqlx::test(migrations = false, fixtures("schema"))]
#[ignore = "PostgreSQL が必要"]
async fn test_存在しないidの更新はエラーにならない(pool: PgPool) {
   let sut = PostgresTaskRepository::new();
   let mut session = open_session(&pool).await;

   let mut tx = session.begin().await.unwrap();
   let result = sut
      .update_completed(&mut tx, Some(planner_domain::task::TaskId::from_i64(404)), Some(true))
      .await;
   tx.commit().await.unwrap();

   assert!(result.is_ok());
}
