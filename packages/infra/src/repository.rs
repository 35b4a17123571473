//! # リポジトリ実装
//!
//! - **テスタビリティ**: トレイト経由でモック可能な設計（[`crate::mock`]）
//! - **セッション明示**: 読み取りは [`DbSession`](crate::db::DbSession)、
//!   書き込みは [`TxContext`](crate::db::TxContext) を引数で受け取る。
//!   リポジトリ自身は接続を保持しない

pub mod goal_repository;
pub mod task_repository;

pub use goal_repository::{GoalRepository, PostgresGoalRepository};
pub use task_repository::{PostgresTaskRepository, TaskRepository};
