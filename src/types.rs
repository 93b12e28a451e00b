/// SHA-256 hex digest of a record's normalized response bytes.
/// Example: `9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08`
pub type HexDigest = String;
/// Category label derived from the first path component under the input root.
/// Examples: `GUI`, `Hotkeys`, `uncategorized`
pub type CategoryName = String;
/// Rendered instruction text paired with a response.
/// Example: `You are maintaining a knowledge base of AutoHotkey examples. ...`
pub type PromptText = String;
/// Normalized snippet text (BOM-stripped, LF line endings, one trailing newline).
pub type ResponseText = String;
/// Root-relative, forward-slash source path.
/// Example: `GUI/Button_Click.ahk`
pub type RelativePath = String;
/// Humanized snippet title used inside prompts.
/// Example: `Array 33 Partition`
pub type TitleText = String;
