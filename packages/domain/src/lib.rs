//! # Planner ドメイン層
//!
//! 目標（Goal）と当日タスク（Task）のモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! api → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB）に依存しない。
//! Goal と Task は互いに関連を持たない独立したコレクションである。
//!
//! ## モジュール構成
//!
//! - [`goal`] - 目標エンティティと作成入力
//! - [`task`] - 当日タスクエンティティと作成入力
//! - [`clock`] - 「今日」の日付を提供する抽象

#[macro_use]
mod macros;

pub mod clock;
pub mod goal;
pub mod task;
