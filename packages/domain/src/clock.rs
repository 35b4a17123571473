//! # Clock（日付プロバイダ）
//!
//! タスクの作成日と一覧の絞り込みに使う「今日」を提供する。
//! テストで固定日付を注入できるようにするための抽象化。

use chrono::{Local, NaiveDate};

/// 今日の日付を提供するトレイト
pub trait Clock: Send + Sync {
   fn today(&self) -> NaiveDate;
}

/// サーバーのローカル日付を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn today(&self) -> NaiveDate {
      Local::now().date_naive()
   }
}

/// 固定日付を返すテスト用実装
pub struct FixedClock {
   today: NaiveDate,
}

impl FixedClock {
   pub fn new(today: NaiveDate) -> Self {
      Self { today }
   }
}

impl Clock for FixedClock {
   fn today(&self) -> NaiveDate {
      self.today
   }
}
