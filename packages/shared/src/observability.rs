//! # ログ基盤
//!
//! Planner のプロセスは起動直後に [`init_tracing`] を 1 回だけ呼ぶ。
//!
//! - 出力形式は `LOG_FORMAT`（`json` / `pretty`）で選ぶ
//! - フィルタは `RUST_LOG`。空または未設定なら [`DEFAULT_FILTER`]
//! - サービス名は [`TracingConfig::root_span`] のフィールド `service` として
//!   JSON ログの `span.service` に出る

use std::{fmt, str::FromStr};

/// `RUST_LOG` が無いときのフィルタ。`planner_*` クレートだけ debug まで出す。
pub const DEFAULT_FILTER: &str = "info,planner=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
   /// 1 行 1 イベントの JSON。ログ収集基盤向け
   Json,
   /// ローカル開発用
   #[default]
   Pretty,
}

/// `LOG_FORMAT` に解釈できない値が入っていた
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLogFormat(pub String);

impl fmt::Display for UnknownLogFormat {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "unknown LOG_FORMAT={:?}", self.0)
   }
}

impl FromStr for LogFormat {
   type Err = UnknownLogFormat;

   fn from_str(s: &str) -> Result<Self, Self::Err> {
      match s {
         "json" => Ok(Self::Json),
         "pretty" => Ok(Self::Pretty),
         other => Err(UnknownLogFormat(other.to_string())),
      }
   }
}

impl LogFormat {
   /// `LOG_FORMAT` の値（未設定なら `None`）から形式を決める
   ///
   /// 解釈できない値は Pretty に倒す。subscriber がまだ無いので警告は stderr に直接書く。
   pub fn from_env_value(value: Option<&str>) -> Self {
      match value.map(str::parse) {
         None => Self::default(),
         Some(Ok(format)) => format,
         Some(Err(e)) => {
            eprintln!("WARNING: {e}, falling back to pretty");
            Self::default()
         }
      }
   }

   pub fn from_env() -> Self {
      Self::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref())
   }
}

/// `RUST_LOG` の値からフィルタ指定を決める
pub fn filter_directives(rust_log: Option<&str>) -> &str {
   match rust_log.map(str::trim) {
      Some(directives) if !directives.is_empty() => directives,
      _ => DEFAULT_FILTER,
   }
}

/// [`init_tracing`] に渡す設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
   pub service_name: String,
   pub log_format:   LogFormat,
}

impl TracingConfig {
   pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
      Self {
         service_name: service_name.into(),
         log_format,
      }
   }

   pub fn from_env(service_name: impl Into<String>) -> Self {
      Self::new(service_name, LogFormat::from_env())
   }

   /// プロセス全体を包むスパン
   ///
   /// バイナリは `main` の先頭で `entered()` したガードを最後まで保持する。
   pub fn root_span(&self) -> tracing::Span {
      tracing::info_span!("app", service = %self.service_name)
   }
}

/// グローバル subscriber を登録する
///
/// 2 回目の呼び出しはパニックする。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
   use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

   let rust_log = std::env::var("RUST_LOG").ok();
   let env_filter =
      EnvFilter::try_new(filter_directives(rust_log.as_deref())).unwrap_or_else(|e| {
         eprintln!("WARNING: invalid RUST_LOG ({e}), using {DEFAULT_FILTER:?}");
         EnvFilter::new(DEFAULT_FILTER)
      });

   let fmt_layer = match config.log_format {
      LogFormat::Json => tracing_subscriber::fmt::layer()
         .json()
         .flatten_event(true)
         .with_target(true)
         .with_current_span(true)
         .with_span_list(false)
         .boxed(),
      LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
   };

   tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt_layer)
      .init();
}
