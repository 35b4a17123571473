//! # PostgreSQL セッション管理
//!
//! リクエストごとに 1 本のデータベース接続（セッション）を開き、
//! 処理の成否にかかわらず閉じる。
//!
//! ## 設計方針
//!
//! - **接続プールなし**: リクエストごとに新しい接続を確立し、終了時に閉じる。
//!   プロセス内でリクエスト間に共有される状態を持たない
//! - **書き込みはトランザクション必須**: 書き込みリポジトリメソッドは
//!   [`TxContext`] を必須引数に取る。トランザクションなしの書き込みは
//!   コンパイルエラーになる
//! - **明示的なクローズ**: [`DbSession::close`] は `self` を消費する。
//!   呼び出し側は成功・失敗どちらの経路でも必ず呼ぶ。パニック時は
//!   `PgConnection` のドロップで接続が破棄される
//!
//! ## ライフサイクル
//!
//! ```text
//! SessionManager::open()
//!    ├── 読み取り: repo.find_*(&mut session)
//!    └── 書き込み: session.begin() → repo.insert/update(&mut tx) → tx.commit()
//! DbSession::close()
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use planner_infra::db::{PgSessionManager, SessionManager};
//!
//! let manager = PgSessionManager::new("postgres://localhost/planner");
//! let mut session = manager.open().await?;
//! let mut tx = session.begin().await?;
//! let id = goal_repo.insert(&mut tx, &new_goal).await?;
//! tx.commit().await?;
//! session.close().await?;
//! ```

use async_trait::async_trait;
use sqlx::{Connection, PgConnection, Postgres, Transaction};

use crate::error::InfraError;
#[cfg(any(test, feature = "test-utils"))]
use crate::mock::SessionLog;

// =============================================================================
// DbSession
// =============================================================================

/// 1 リクエスト分のデータベースセッション
pub struct DbSession(DbSessionInner);

enum DbSessionInner {
   Pg(PgConnection),
   #[cfg(any(test, feature = "test-utils"))]
   Mock(std::sync::Arc<SessionLog>),
}

impl DbSession {
   /// PostgreSQL に接続してセッションを開く
   ///
   /// `PgSessionManager` のみが使用する。
   pub(crate) async fn connect_pg(database_url: &str) -> Result<Self, InfraError> {
      let conn = PgConnection::connect(database_url).await?;
      Ok(Self::from_connection(conn))
   }

   /// 確立済みの接続からセッションを作る
   ///
   /// 統合テストでは `sqlx::test` が用意した接続をここに渡す。
   pub fn from_connection(conn: PgConnection) -> Self {
      Self(DbSessionInner::Pg(conn))
   }

   /// テスト用のモックセッションを作成する
   ///
   /// コミットとクローズの回数を `log` に記録する。
   /// Mock リポジトリはインメモリ実装のため接続を使用しない。
   #[cfg(any(test, feature = "test-utils"))]
   pub fn mock(log: std::sync::Arc<SessionLog>) -> Self {
      Self(DbSessionInner::Mock(log))
   }

   /// トランザクションを開始する
   ///
   /// 返される [`TxContext`] はこのセッションを借用する。
   /// `commit()` を呼ばずにドロップするとロールバックされる。
   pub async fn begin(&mut self) -> Result<TxContext<'_>, InfraError> {
      match &mut self.0 {
         DbSessionInner::Pg(conn) => Ok(TxContext(TxContextInner::Pg(conn.begin().await?))),
         #[cfg(any(test, feature = "test-utils"))]
         DbSessionInner::Mock(log) => Ok(TxContext(TxContextInner::Mock(log.clone()))),
      }
   }

   /// 接続が生きていることを確認する（Readiness Check 用）
   pub async fn ping(&mut self) -> Result<(), InfraError> {
      match &mut self.0 {
         DbSessionInner::Pg(conn) => {
            sqlx::query("SELECT 1").execute(&mut *conn).await?;
            Ok(())
         }
         #[cfg(any(test, feature = "test-utils"))]
         DbSessionInner::Mock(_) => Ok(()),
      }
   }

   /// セッションを閉じる
   ///
   /// PostgreSQL には Terminate メッセージを送ってから切断する。
   pub async fn close(self) -> Result<(), InfraError> {
      match self.0 {
         DbSessionInner::Pg(conn) => {
            conn.close().await?;
            Ok(())
         }
         #[cfg(any(test, feature = "test-utils"))]
         DbSessionInner::Mock(log) => {
            log.record_close();
            Ok(())
         }
      }
   }

   /// セッションの DB コネクションを取得する（読み取りリポジトリ用）
   pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, InfraError> {
      match &mut self.0 {
         DbSessionInner::Pg(conn) => Ok(conn),
         #[cfg(any(test, feature = "test-utils"))]
         DbSessionInner::Mock(_) => Err(InfraError::unexpected(
            "モックセッションは DB コネクションを持たない",
         )),
      }
   }
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// 書き込みリポジトリメソッドの必須引数。
///
/// 1. `DbSession::begin()` で作成
/// 2. 書き込みメソッドに `&mut TxContext` として渡す
/// 3. `commit()` でコミット、またはドロップでロールバック
pub struct TxContext<'s>(TxContextInner<'s>);

enum TxContextInner<'s> {
   Pg(Transaction<'s, Postgres>),
   #[cfg(any(test, feature = "test-utils"))]
   Mock(std::sync::Arc<SessionLog>),
}

impl TxContext<'_> {
   /// トランザクションをコミットする
   pub async fn commit(self) -> Result<(), InfraError> {
      match self.0 {
         TxContextInner::Pg(tx) => {
            tx.commit().await?;
            Ok(())
         }
         #[cfg(any(test, feature = "test-utils"))]
         TxContextInner::Mock(log) => {
            log.record_commit();
            Ok(())
         }
      }
   }

   /// トランザクション内の DB コネクションを取得する（書き込みリポジトリ用）
   pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, InfraError> {
      match &mut self.0 {
         TxContextInner::Pg(tx) => Ok(&mut **tx),
         #[cfg(any(test, feature = "test-utils"))]
         TxContextInner::Mock(_) => Err(InfraError::unexpected(
            "モックトランザクションは DB コネクションを持たない",
         )),
      }
   }
}

// =============================================================================
// SessionManager
// =============================================================================

/// セッション生成 trait
///
/// ルーターは接続先 URL を知らず、この trait 経由でセッションを開く。
#[async_trait]
pub trait SessionManager: Send + Sync {
   /// 新しいセッションを開く
   async fn open(&self) -> Result<DbSession, InfraError>;
}

/// PostgreSQL 用 SessionManager 実装
///
/// `open()` のたびに `database_url` へ新しい接続を張る。
#[derive(Debug, Clone)]
pub struct PgSessionManager {
   database_url: String,
}

impl PgSessionManager {
   pub fn new(database_url: impl Into<String>) -> Self {
      Self {
         database_url: database_url.into(),
      }
   }
}

#[async_trait]
impl SessionManager for PgSessionManager {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn open(&self) -> Result<DbSession, InfraError> {
      DbSession::connect_pg(&self.database_url).await
   }
}

#[cfg(test)]
mod tests {
   use std::sync::Arc;

   use super::*;

   fn assert_send<T: Send>() {}
   fn assert_send_sync<T: Send + Sync>() {}

   #[test]
   fn test_db_sessionはsendを実装している() {
      assert_send::<DbSession>();
      assert_send::<TxContext<'static>>();
   }

   #[test]
   fn test_session_manager_traitはsendとsyncを実装している() {
      assert_send_sync::<PgSessionManager>();
      assert_send_sync::<Box<dyn SessionManager>>();
   }

   #[tokio::test]
   async fn test_モックセッションはコミットとクローズを記録する() {
      let log = Arc::new(SessionLog::default());
      let mut session = DbSession::mock(log.clone());

      let tx = session.begin().await.unwrap();
      tx.commit().await.unwrap();
      session.close().await.unwrap();

      assert_eq!(log.commits(), 1);
      assert_eq!(log.closed(), 1);
   }

   #[tokio::test]
   async fn test_ドロップしたトランザクションはコミットを記録しない() {
      let log = Arc::new(SessionLog::default());
      let mut session = DbSession::mock(log.clone());

      {
         let _tx = session.begin().await.unwrap();
      }
      session.close().await.unwrap();

      assert_eq!(log.commits(), 0);
      assert_eq!(log.closed(), 1);
   }

   #[test]
   fn test_モックセッションのconnはエラーを返す() {
      let mut session = DbSession::mock(Arc::new(SessionLog::default()));
      assert!(session.conn().is_err());
   }
}
