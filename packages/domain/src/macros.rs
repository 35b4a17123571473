/// ストレージ採番の整数 ID 型を定義する宣言型マクロ
///
/// 以下のボイラープレートを一括生成する:
/// - Newtype 構造体（`i64` をラップ、serde では数値そのものとして扱う）
/// - `derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)`
/// - `from_i64()` / `as_i64()`
///
/// ID は INSERT 時に DB の SERIAL 列が採番するため、`new()` は生成しない。
///
/// # 使用例
///
/// ```rust
/// use planner_domain::goal::GoalId;
///
/// let id = GoalId::from_i64(42);
/// assert_eq!(id.as_i64(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
macro_rules! define_serial_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, Copy, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[serde(transparent)]
      #[display("{_0}")]
      $vis struct $Name(i64);

      impl $Name {
         /// DB から取得した値やリクエストで受け取った値から ID を作成する
         pub fn from_i64(value: i64) -> Self {
            Self(value)
         }

         /// 内部の整数値を取得する
         pub fn as_i64(&self) -> i64 {
            self.0
         }
      }
   };
}
