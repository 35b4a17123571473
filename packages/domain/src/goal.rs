//! # 目標（Goal）
//!
//! 自己成長の目標を表すエンティティ。進捗率と完了フラグを持つ。
//!
//! ## ライフサイクル
//!
//! - 作成: `add_goal` で [`NewGoal`] から挿入（`progress = 0`, `completed = false`）
//! - 更新: 完了フラグと進捗をフィールド単位で更新
//! - 削除: このインターフェースでは行わない
//!
//! ## NULL の扱い
//!
//! 作成時に入力検証は行わず、`title` が無ければ NULL のまま保存する。
//! そのため読み出し時の各カラムは `Option` で表す。

use serde::Serialize;

/// 目標に付与するデフォルトカテゴリ
pub const DEFAULT_GOAL_CATEGORY: &str = "goals";

/// 作成直後の進捗
pub const INITIAL_PROGRESS: i32 = 0;

define_serial_id! {
   /// 目標の一意識別子（`goals.id`）
   pub struct GoalId;
}

/// 目標エンティティ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Goal {
   id:        GoalId,
   title:     Option<String>,
   category:  Option<String>,
   progress:  Option<i32>,
   completed: Option<bool>,
}

impl Goal {
   /// DB の行から復元する
   pub fn from_db(
      id: GoalId,
      title: Option<String>,
      category: Option<String>,
      progress: Option<i32>,
      completed: Option<bool>,
   ) -> Self {
      Self {
         id,
         title,
         category,
         progress,
         completed,
      }
   }

   /// [`NewGoal`] に採番済み ID を付けて、挿入直後の状態を組み立てる
   pub fn created(id: GoalId, new_goal: NewGoal) -> Self {
      Self {
         id,
         title: new_goal.title,
         category: new_goal.category,
         progress: Some(INITIAL_PROGRESS),
         completed: Some(false),
      }
   }

   pub fn id(&self) -> GoalId {
      self.id
   }

   pub fn title(&self) -> Option<&str> {
      self.title.as_deref()
   }

   pub fn category(&self) -> Option<&str> {
      self.category.as_deref()
   }

   pub fn progress(&self) -> Option<i32> {
      self.progress
   }

   pub fn completed(&self) -> Option<bool> {
      self.completed
   }

   /// 完了フラグを置き換えた目標を返す
   pub fn with_completed(self, completed: bool) -> Self {
      Self {
         completed: Some(completed),
         ..self
      }
   }

   /// 進捗を置き換えた目標を返す
   pub fn with_progress(self, progress: i32) -> Self {
      Self {
         progress: Some(progress),
         ..self
      }
   }
}

/// 目標の作成入力
///
/// `category` の既定値（[`DEFAULT_GOAL_CATEGORY`]）はリクエストの
/// デコード時に適用済みであること。ここで `None` なら NULL として保存される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
   pub title:    Option<String>,
   pub category: Option<String>,
}
