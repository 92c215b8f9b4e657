//! Todo list management.
//!
//! Items are addressed by their current 1-based position. Positions shift
//! after a removal, so a second index-based command must be based on a fresh
//! listing.

use chrono::{DateTime, Utc};
use saver_models::{TodoAction, TodoCommand, TodoItem};
use saver_persistence::TodoStore;
use tracing::debug;

use crate::dates::normalize_digits;
use crate::error::Result;
use crate::messages;

/// Applies a todo command to the user's list.
pub fn handle_todo(
    store: &TodoStore,
    command: &TodoCommand,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut todos = store.load(user_id);

    match command.action {
        TodoAction::Add => {
            let Some(text) = command.task.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
                return Ok(messages::TODO_MISSING_TEXT.to_string());
            };
            todos.push(TodoItem::new(text, now));
            store.save(user_id, &todos)?;
            debug!(user_id, count = todos.len(), "Todo added");
            Ok(format!("✅ کار جدید اضافه شد: «{}»", text))
        }
        TodoAction::List => Ok(render_list(&todos)),
        TodoAction::Complete => {
            let Some(index) = resolve_index(command.task.as_deref(), todos.len()) else {
                return Ok(messages::TODO_INVALID_INDEX.to_string());
            };
            todos[index].completed = true;
            store.save(user_id, &todos)?;
            Ok(format!(
                "✅ کار «{}» به عنوان انجام شده علامت‌گذاری شد.",
                todos[index].text
            ))
        }
        TodoAction::Remove => {
            let Some(index) = resolve_index(command.task.as_deref(), todos.len()) else {
                return Ok(messages::TODO_INVALID_INDEX.to_string());
            };
            let removed = todos.remove(index);
            store.save(user_id, &todos)?;
            Ok(format!("🗑️ کار «{}» حذف شد.", removed.text))
        }
        TodoAction::Unsupported => Ok(messages::TODO_INVALID_ACTION.to_string()),
    }
}

fn render_list(todos: &[TodoItem]) -> String {
    if todos.is_empty() {
        return messages::TODO_EMPTY.to_string();
    }
    let mut text = String::from("📝 لیست کارهای شما:\n\n");
    for (i, todo) in todos.iter().enumerate() {
        let status = if todo.completed { "✅" } else { "⬜" };
        text.push_str(&format!("{}. {} {}\n", i + 1, status, todo.text));
    }
    text
}

/// Reads the leading number of `task` as a 1-based position and returns the
/// 0-based index if it is within the list.
fn resolve_index(task: Option<&str>, len: usize) -> Option<usize> {
    let normalized = normalize_digits(task?.trim());
    let digits: String = normalized.chars().take_while(char::is_ascii_digit).collect();
    let position: usize = digits.parse().ok()?;
    (1..=len).contains(&position).then(|| position - 1)
}
