//! # Planner インフラ層
//!
//! PostgreSQL との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **セッション管理**: リクエストごとの接続の確立と解放
//! - **リポジトリ実装**: 目標・タスクの読み書き
//!
//! ## 依存関係
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - セッション（接続）とトランザクション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリトレイトと PostgreSQL 実装
//! - `mock` - インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use db::{DbSession, PgSessionManager, SessionManager, TxContext};
pub use error::{InfraError, InfraErrorKind};
