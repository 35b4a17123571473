//! # Planner API
//!
//! 目標と日次タスクを扱う JSON リクエストハンドラ。
//!
//! ## 構成
//!
//! ```text
//! HTTP ──▶ handler::gateway ──▶ RequestRouter ──▶ Route::decode
//!                                    │
//!                                    ├── SessionManager（リクエストごとに open/close）
//!                                    └── GoalRepository / TaskRepository
//! ```
//!
//! ## モジュール構成
//!
//! - [`app`] - axum ルーターの組み立て
//! - [`config`] - 環境変数からの設定読み込み
//! - [`error`] - ルーターが伝播させる障害と 500 レスポンスへの変換
//! - [`event`] - リクエスト／レスポンス記述子
//! - [`handler`] - HTTP ハンドラ（fallback とヘルスチェック）
//! - [`response`] - レスポンスの組み立て
//! - [`route`] - メソッドと論理エンドポイント名による振り分け
//! - [`router`] - [`RequestRouter`](router::RequestRouter)

pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod response;
pub mod route;
pub mod router;
