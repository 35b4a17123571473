//! # Planner API サーバー
//!
//! [`RequestRouter`] を axum の HTTP サーバーとして公開する。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `PLANNER_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `PLANNER_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `LOG_FORMAT` | No | `json` または `pretty`（デフォルト: `pretty`） |
//! | `RUST_LOG` | No | ログフィルタ（デフォルト: `info,planner=debug`） |
//!
//! ## 起動方法
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/planner cargo run --bin planner-api
//! ```
//!
//! 起動時にデータベースへは接続しない。接続はリクエストごとに行う。

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use planner_api::{
   app::build_app,
   config::AppConfig,
   handler::ReadinessState,
   router::RequestRouter,
};
use planner_domain::clock::SystemClock;
use planner_infra::PgSessionManager;
use planner_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   let tracing_config = TracingConfig::from_env("planner-api");
   init_tracing(&tracing_config);
   let _root_span = tracing_config.root_span().entered();

   let config = AppConfig::from_env().context("DATABASE_URL が設定されていません")?;

   tracing::info!(
      "Planner API サーバーを起動します: {}:{}",
      config.server.host,
      config.server.port
   );

   let router = RequestRouter::from_config(&config.database, Arc::new(SystemClock));
   let readiness = ReadinessState {
      sessions: Arc::new(PgSessionManager::new(config.database.url.clone())),
   };
   let app = build_app(Arc::new(router), Arc::new(readiness));

   let addr: SocketAddr = config
      .bind_address()
      .parse()
      .with_context(|| format!("アドレスのパースに失敗しました: {}", config.bind_address()))?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Planner API サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
