//! # Planner 共有ユーティリティ
//!
//! domain / infra / api の各クレートから使われる共通ユーティリティ。
//! ビジネスロジックは含めない。

pub mod health;
pub mod observability;
pub mod request_id;

pub use health::{CheckStatus, DATABASE_CHECK, HealthResponse, ReadinessResponse, ReadinessStatus};
pub use request_id::RequestId;
