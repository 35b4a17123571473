//! # GoalRepository
//!
//! 目標（`goals` テーブル）の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **存在チェックなし**: UPDATE は 0 行でも成功扱い
//! - **カラム単位の更新**: 完了フラグと進捗は別々の UPDATE で更新し、
//!   指定されなかったカラムには触れない
//! - **ID は DB 採番**: INSERT ... RETURNING で採番済み ID を受け取る

use async_trait::async_trait;
use planner_domain::goal::{Goal, GoalId, INITIAL_PROGRESS, NewGoal};

use crate::{
   db::{DbSession, TxContext},
   error::InfraError,
};

/// 目標リポジトリトレイト
#[async_trait]
pub trait GoalRepository: Send + Sync {
   /// 全目標を ID 昇順で取得する
   async fn find_all(&self, session: &mut DbSession) -> Result<Vec<Goal>, InfraError>;

   /// 目標を挿入し、採番された ID を返す
   ///
   /// `progress = 0`, `completed = false` で作成する。
   async fn insert(&self, tx: &mut TxContext<'_>, new_goal: &NewGoal) -> Result<GoalId, InfraError>;

   /// 完了フラグを更新する
   ///
   /// `id` が `None` の場合は `WHERE id = NULL` となり、どの行にも一致しない。
   async fn update_completed(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      completed: bool,
   ) -> Result<(), InfraError>;

   /// 進捗を更新する
   async fn update_progress(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      progress: i32,
   ) -> Result<(), InfraError>;
}

/// `goals` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct GoalRow {
   id:        i64,
   title:     Option<String>,
   category:  Option<String>,
   progress:  Option<i32>,
   completed: Option<bool>,
}

impl From<GoalRow> for Goal {
   fn from(row: GoalRow) -> Self {
      Goal::from_db(
         GoalId::from_i64(row.id),
         row.title,
         row.category,
         row.progress,
         row.completed,
      )
   }
}

/// PostgreSQL 実装の GoalRepository
#[derive(Debug, Clone, Default)]
pub struct PostgresGoalRepository;

impl PostgresGoalRepository {
   pub fn new() -> Self {
      Self
   }
}

#[async_trait]
impl GoalRepository for PostgresGoalRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self, session: &mut DbSession) -> Result<Vec<Goal>, InfraError> {
      // SERIAL（int4）でも BIGSERIAL でも読めるよう id は bigint にキャストする
      let rows = sqlx::query_as::<_, GoalRow>(
         r#"
         SELECT id::bigint AS id, title, category, progress, completed
         FROM goals
         ORDER BY id
         "#,
      )
      .fetch_all(session.conn()?)
      .await?;

      Ok(rows.into_iter().map(Goal::from).collect())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn insert(&self, tx: &mut TxContext<'_>, new_goal: &NewGoal) -> Result<GoalId, InfraError> {
      let id: i64 = sqlx::query_scalar(
         r#"
         INSERT INTO goals (title, category, progress, completed)
         VALUES ($1, $2, $3, false)
         RETURNING id::bigint
         "#,
      )
      .bind(new_goal.title.as_deref())
      .bind(new_goal.category.as_deref())
      .bind(INITIAL_PROGRESS)
      .fetch_one(tx.conn()?)
      .await?;

      Ok(GoalId::from_i64(id))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = ?id, completed = completed))]
   async fn update_completed(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      completed: bool,
   ) -> Result<(), InfraError> {
      sqlx::query("UPDATE goals SET completed = $1 WHERE id = $2")
         .bind(completed)
         .bind(id.map(|id| id.as_i64()))
         .execute(tx.conn()?)
         .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(id = ?id, progress = progress))]
   async fn update_progress(
      &self,
      tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      progress: i32,
   ) -> Result<(), InfraError> {
      sqlx::query("UPDATE goals SET progress = $1 WHERE id = $2")
         .bind(progress)
         .bind(id.map(|id| id.as_i64()))
         .execute(tx.conn()?)
         .await?;

      Ok(())
   }
}
