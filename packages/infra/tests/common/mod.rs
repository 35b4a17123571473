//! テスト共通ヘルパー
//!
//! `sqlx::test` が用意したテスト用データベースのプールから
//! 接続を切り離し、[`DbSession`] として渡す。

#![allow(dead_code)]

use chrono::NaiveDate;
use planner_infra::DbSession;
use sqlx::PgPool;

pub async fn open_session(pool: &PgPool) -> DbSession {
   let conn = pool.acquire().await.unwrap().detach();
   DbSession::from_connection(conn)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
   NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
