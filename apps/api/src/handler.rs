//! # HTTP リクエストハンドラ
//!
//! ```text
//! handler.rs
//! └── handler/
//!     ├── gateway.rs  # fallback: HTTP ⇔ HttpEvent の詰め替え
//!     └── health.rs   # /health, /health/ready
//! ```

pub mod gateway;
pub mod health;

pub use gateway::{REQUEST_ID_HEADER, gateway};
pub use health::{ReadinessState, health_check, readiness_check};
