//! # ルートのデコード
//!
//! [`HttpEvent`] をメソッドと論理エンドポイント名で振り分け、
//! 型付きの [`Route`] に変換する。データベースには触れない純粋な処理。
//!
//! ## 振り分け表
//!
//! | メソッド | セレクタ | 値 | ルート |
//! |----------|----------|----|--------|
//! | `GET` | クエリ `endpoint`（省略時 `goals`） | `goals` | [`Route::ListGoals`] |
//! | | | `tasks` | [`Route::ListTasks`] |
//! | `POST` | ボディ `action` | `add_goal` | [`Route::AddGoal`] |
//! | | | `add_task` | [`Route::AddTask`] |
//! | `PUT` | ボディ `endpoint` | `goal` | [`Route::UpdateGoal`] |
//! | | | `task` | [`Route::UpdateTask`] |
//!
//! 上記以外はすべて [`Route::Unsupported`]（405）。`OPTIONS` はルーターが
//! デコード前に処理するため、ここでは扱わない。
//!
//! ## フィールドの有無
//!
//! - `category` / `time` はキーが**無い**ときだけデフォルト値になる。
//!   明示的な `null` はそのまま null として保存される
//! - 目標の `completed` / `progress` は null でないときだけ更新対象
//! - タスクの `completed` は null でも書き込む
//!
//! キーが存在して型が合わない（`progress` が文字列など）場合は
//! [`RouterError::MalformedBody`]。

use planner_domain::{
   goal::{DEFAULT_GOAL_CATEGORY, GoalId},
   task::{DEFAULT_TASK_TIME, TaskId},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{error::RouterError, event::HttpEvent};

/// `GET` でクエリに `endpoint` が無い場合の値
pub const DEFAULT_LIST_ENDPOINT: &str = "goals";

fn default_category() -> Option<String> {
   Some(DEFAULT_GOAL_CATEGORY.to_string())
}

fn default_time() -> Option<String> {
   Some(DEFAULT_TASK_TIME.to_string())
}

/// `add_goal` のボディ
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddGoalBody {
   #[serde(default)]
   pub title:    Option<String>,
   #[serde(default = "default_category")]
   pub category: Option<String>,
}

/// `add_task` のボディ
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddTaskBody {
   #[serde(default)]
   pub title: Option<String>,
   #[serde(default = "default_time")]
   pub time:  Option<String>,
}

/// `PUT endpoint=goal` のボディ
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateGoalBody {
   #[serde(default)]
   pub id:        Option<GoalId>,
   #[serde(default)]
   pub completed: Option<bool>,
   #[serde(default)]
   pub progress:  Option<i32>,
}

/// `PUT endpoint=task` のボディ
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateTaskBody {
   #[serde(default)]
   pub id:        Option<TaskId>,
   #[serde(default)]
   pub completed: Option<bool>,
}

/// デコード済みのルート
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
   ListGoals,
   ListTasks,
   AddGoal(AddGoalBody),
   AddTask(AddTaskBody),
   UpdateGoal(UpdateGoalBody),
   UpdateTask(UpdateTaskBody),
   /// どの組み合わせにも一致しない（405）
   Unsupported,
}

impl Route {
   /// イベントをルートに変換する
   ///
   /// メソッド名は大文字小文字を区別する。
   pub fn decode(event: &HttpEvent) -> Result<Self, RouterError> {
      match event.http_method.as_str() {
         "GET" => Ok(Self::decode_list(event)),
         "POST" => Self::decode_create(&parse_body(event)?),
         "PUT" => Self::decode_update(&parse_body(event)?),
         _ => Ok(Self::Unsupported),
      }
   }

   /// ログ用の短い名前
   pub fn name(&self) -> &'static str {
      match self {
         Self::ListGoals => "list_goals",
         Self::ListTasks => "list_tasks",
         Self::AddGoal(_) => "add_goal",
         Self::AddTask(_) => "add_task",
         Self::UpdateGoal(_) => "update_goal",
         Self::UpdateTask(_) => "update_task",
         Self::Unsupported => "unsupported",
      }
   }

   fn decode_list(event: &HttpEvent) -> Self {
      match event.query("endpoint").unwrap_or(DEFAULT_LIST_ENDPOINT) {
         "goals" => Self::ListGoals,
         "tasks" => Self::ListTasks,
         _ => Self::Unsupported,
      }
   }

   fn decode_create(body: &Map<String, Value>) -> Result<Self, RouterError> {
      match selector(body, "action") {
         Some("add_goal") => Ok(Self::AddGoal(fields(body)?)),
         Some("add_task") => Ok(Self::AddTask(fields(body)?)),
         _ => Ok(Self::Unsupported),
      }
   }

   fn decode_update(body: &Map<String, Value>) -> Result<Self, RouterError> {
      match selector(body, "endpoint") {
         Some("goal") => Ok(Self::UpdateGoal(fields(body)?)),
         Some("task") => Ok(Self::UpdateTask(fields(body)?)),
         _ => Ok(Self::Unsupported),
      }
   }
}

/// ボディを JSON オブジェクトとして読む
///
/// ボディが無い、または空白のみの場合は空オブジェクトとみなす。
fn parse_body(event: &HttpEvent) -> Result<Map<String, Value>, RouterError> {
   let text = event.body.as_deref().unwrap_or_default();
   if text.trim().is_empty() {
      return Ok(Map::new());
   }

   match serde_json::from_str(text).map_err(RouterError::MalformedBody)? {
      Value::Object(map) => Ok(map),
      _ => Err(RouterError::MalformedBody(serde::de::Error::custom(
         "request body must be a JSON object",
      ))),
   }
}

/// セレクタ（`action` / `endpoint`）の値
///
/// 文字列以外は一致しないセレクタとして扱う。
fn selector<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
   body.get(key).and_then(Value::as_str)
}

fn fields<T: DeserializeOwned>(body: &Map<String, Value>) -> Result<T, RouterError> {
   serde_json::from_value(Value::Object(body.clone())).map_err(RouterError::MalformedBody)
}
