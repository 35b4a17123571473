//! # 当日タスク（Task）
//!
//! 日付ごとの ToDo を表すエンティティ。
//!
//! ## ライフサイクル
//!
//! - 作成: `add_task` で作成日（`task_date`）を刻印して挿入（`completed = false`）
//! - 更新: 完了フラグのみ
//! - 一覧: `task_date` が今日の行だけが見える。過去日のタスクは削除も
//!   アーカイブもされず、一覧クエリから外れるだけ
//!
//! `task_date` は絞り込み専用の列であり、エンティティには含めない。

use chrono::NaiveDate;
use serde::Serialize;

/// 時刻ラベルの既定値
pub const DEFAULT_TASK_TIME: &str = "12:00";

define_serial_id! {
   /// タスクの一意識別子（`tasks.id`）
   pub struct TaskId;
}

/// タスクエンティティ
///
/// `time` は自由形式の時刻ラベルで、パースはしない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
   id:        TaskId,
   title:     Option<String>,
   time:      Option<String>,
   completed: Option<bool>,
}

impl Task {
   /// DB の行から復元する
   pub fn from_db(
      id: TaskId,
      title: Option<String>,
      time: Option<String>,
      completed: Option<bool>,
   ) -> Self {
      Self {
         id,
         title,
         time,
         completed,
      }
   }

   pub fn id(&self) -> TaskId {
      self.id
   }

   pub fn title(&self) -> Option<&str> {
      self.title.as_deref()
   }

   pub fn time(&self) -> Option<&str> {
      self.time.as_deref()
   }

   pub fn completed(&self) -> Option<bool> {
      self.completed
   }

   /// 完了フラグを置き換えたタスクを返す（NULL もそのまま書き込む）
   pub fn with_completed(self, completed: Option<bool>) -> Self {
      Self { completed, ..self }
   }
}

/// タスクの作成入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
   pub title:     Option<String>,
   pub time:      Option<String>,
   /// 作成日。一覧の絞り込みキーになる
   pub task_date: NaiveDate,
}
