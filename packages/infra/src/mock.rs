//! # テスト用モック
//!
//! ルーターのテストで使用するインメモリモックリポジトリとセッション。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! planner-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! モックリポジトリはトランザクションを無視して即座に反映する。
//! コミットされたかどうかは [`SessionLog`] で検証する。

use std::sync::{
   Arc,
   Mutex,
   atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use planner_domain::{
   goal::{Goal, GoalId, NewGoal},
   task::{NewTask, Task, TaskId},
};

use crate::{
   db::{DbSession, SessionManager, TxContext},
   error::InfraError,
   repository::{GoalRepository, TaskRepository},
};

// ===== SessionLog =====

/// モックセッションの開閉とコミットの回数
#[derive(Debug, Default)]
pub struct SessionLog {
   opened:  AtomicUsize,
   closed:  AtomicUsize,
   commits: AtomicUsize,
}

impl SessionLog {
   pub fn opened(&self) -> usize {
      self.opened.load(Ordering::SeqCst)
   }

   pub fn closed(&self) -> usize {
      self.closed.load(Ordering::SeqCst)
   }

   pub fn commits(&self) -> usize {
      self.commits.load(Ordering::SeqCst)
   }

   pub(crate) fn record_open(&self) {
      self.opened.fetch_add(1, Ordering::SeqCst);
   }

   pub(crate) fn record_close(&self) {
      self.closed.fetch_add(1, Ordering::SeqCst);
   }

   pub(crate) fn record_commit(&self) {
      self.commits.fetch_add(1, Ordering::SeqCst);
   }
}

// ===== MockSessionManager =====

#[derive(Clone, Default)]
pub struct MockSessionManager {
   log:         Arc<SessionLog>,
   unavailable: bool,
}

impl MockSessionManager {
   pub fn new() -> Self {
      Self::default()
   }

   /// `open()` が常に失敗するマネージャ（DB ダウンの再現）
   pub fn unavailable() -> Self {
      Self {
         log:         Arc::new(SessionLog::default()),
         unavailable: true,
      }
   }

   pub fn log(&self) -> Arc<SessionLog> {
      self.log.clone()
   }
}

#[async_trait]
impl SessionManager for MockSessionManager {
   async fn open(&self) -> Result<DbSession, InfraError> {
      if self.unavailable {
         return Err(sqlx::Error::Io(std::io::ErrorKind::ConnectionRefused.into()).into());
      }
      self.log.record_open();
      Ok(DbSession::mock(self.log.clone()))
   }
}

// ===== MockGoalRepository =====

#[derive(Clone, Default)]
pub struct MockGoalRepository {
   goals:   Arc<Mutex<Vec<Goal>>>,
   failing: bool,
}

impl MockGoalRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// すべての操作が失敗するリポジトリ（制約違反などの再現）
   pub fn failing() -> Self {
      Self {
         goals:   Arc::new(Mutex::new(Vec::new())),
         failing: true,
      }
   }

   pub fn add_goal(&self, goal: Goal) {
      self.goals.lock().unwrap().push(goal);
   }

   pub fn goals(&self) -> Vec<Goal> {
      self.goals.lock().unwrap().clone()
   }

   fn check(&self) -> Result<(), InfraError> {
      if self.failing {
         return Err(InfraError::unexpected("MockGoalRepository: 失敗を注入"));
      }
      Ok(())
   }

   fn update_where(&self, id: Option<GoalId>, f: impl Fn(Goal) -> Goal) {
      let mut goals = self.goals.lock().unwrap();
      if let Some(slot) = goals.iter_mut().find(|g| Some(g.id()) == id) {
         *slot = f(slot.clone());
      }
   }
}

#[async_trait]
impl GoalRepository for MockGoalRepository {
   async fn find_all(&self, _session: &mut DbSession) -> Result<Vec<Goal>, InfraError> {
      self.check()?;
      let mut goals = self.goals();
      goals.sort_by_key(|g| g.id().as_i64());
      Ok(goals)
   }

   async fn insert(&self, _tx: &mut TxContext<'_>, new_goal: &NewGoal) -> Result<GoalId, InfraError> {
      self.check()?;
      let mut goals = self.goals.lock().unwrap();
      let next = goals.iter().map(|g| g.id().as_i64()).max().unwrap_or(0) + 1;
      let id = GoalId::from_i64(next);
      goals.push(Goal::created(id, new_goal.clone()));
      Ok(id)
   }

   async fn update_completed(
      &self,
      _tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      completed: bool,
   ) -> Result<(), InfraError> {
      self.check()?;
      self.update_where(id, |g| g.with_completed(completed));
      Ok(())
   }

   async fn update_progress(
      &self,
      _tx: &mut TxContext<'_>,
      id: Option<GoalId>,
      progress: i32,
   ) -> Result<(), InfraError> {
      self.check()?;
      self.update_where(id, |g| g.with_progress(progress));
      Ok(())
   }
}

// ===== MockTaskRepository =====

#[derive(Clone, Default)]
pub struct MockTaskRepository {
   tasks: Arc<Mutex<Vec<(Task, NaiveDate)>>>,
}

impl MockTaskRepository {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn add_task(&self, task: Task, task_date: NaiveDate) {
      self.tasks.lock().unwrap().push((task, task_date));
   }

   /// 作成日を含めた全タスク
   pub fn tasks(&self) -> Vec<(Task, NaiveDate)> {
      self.tasks.lock().unwrap().clone()
   }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
   async fn find_by_date(
      &self,
      _session: &mut DbSession,
      task_date: NaiveDate,
   ) -> Result<Vec<Task>, InfraError> {
      let mut tasks: Vec<Task> = self
         .tasks()
         .into_iter()
         .filter(|(_, date)| *date == task_date)
         .map(|(task, _)| task)
         .collect();
      tasks.sort_by_key(|t| t.id().as_i64());
      Ok(tasks)
   }

   async fn insert(&self, _tx: &mut TxContext<'_>, new_task: &NewTask) -> Result<TaskId, InfraError> {
      let mut tasks = self.tasks.lock().unwrap();
      let next = tasks.iter().map(|(t, _)| t.id().as_i64()).max().unwrap_or(0) + 1;
      let id = TaskId::from_i64(next);
      let task = Task::from_db(id, new_task.title.clone(), new_task.time.clone(), Some(false));
      tasks.push((task, new_task.task_date));
      Ok(id)
   }

   async fn update_completed(
      &self,
      _tx: &mut TxContext<'_>,
      id: Option<TaskId>,
      completed: Option<bool>,
   ) -> Result<(), InfraError> {
      let mut tasks = self.tasks.lock().unwrap();
      if let Some(slot) = tasks.iter_mut().find(|(t, _)| Some(t.id()) == id) {
         slot.0 = slot.0.clone().with_completed(completed);
      }
      Ok(())
   }
}
