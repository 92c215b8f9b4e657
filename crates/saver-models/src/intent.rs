//! Intents returned by the reasoning service.
//!
//! Each variant carries only the fields valid for it. Mapping the model's
//! untyped JSON into [`Intent`] happens in one place, the decoder in
//! `saver-core`; these types only describe the payload shapes.

use serde::{Deserialize, Deserializer};

use crate::reminder::Recurrence;

/// The closed set of things a user message can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Schedule a reminder.
    Reminder(ReminderRequest),
    /// A direct answer to relay to the user.
    Question {
        /// Answer text.
        answer: String,
    },
    /// Manage the todo list.
    Todo(TodoCommand),
    /// Weather lookup.
    Weather(WeatherRequest),
    /// Calendar and date queries.
    Calendar(CalendarRequest),
    /// The model explicitly could not classify the message.
    Unknown,
}

impl Intent {
    /// Returns the wire tag of this intent.
    pub fn tag(&self) -> &'static str {
        match self {
            Intent::Reminder(_) => "reminder",
            Intent::Question { .. } => "question",
            Intent::Todo(_) => "todo",
            Intent::Weather(_) => "weather",
            Intent::Calendar(_) => "calendar",
            Intent::Unknown => "unknown",
        }
    }
}

/// Payload of a reminder intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReminderRequest {
    /// Time of day as given by the model, e.g. `"09:00"`.
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    /// Date as given by the model: ISO Gregorian, Persian, or a relative word.
    #[serde(deserialize_with = "string_or_number")]
    pub date: String,
    /// What to remind about.
    #[serde(default)]
    pub description: String,
    /// Repeat mode.
    #[serde(default)]
    pub recurrence: Recurrence,
}

/// Todo list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoAction {
    /// Append a task.
    Add,
    /// Show the list.
    #[serde(alias = "show")]
    List,
    /// Mark the task at a 1-based index as done.
    #[serde(alias = "done")]
    Complete,
    /// Delete the task at a 1-based index.
    #[serde(alias = "delete")]
    Remove,
    /// Anything else.
    #[serde(other)]
    Unsupported,
}

/// Payload of a todo intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TodoCommand {
    /// Operation.
    pub action: TodoAction,
    /// Task text for `add`, 1-based index for `complete` and `remove`.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub task: Option<String>,
}

/// Coarse date bucket of a weather request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Option<String>")]
pub enum WeatherDay {
    /// Today, also used for anything unrecognized.
    #[default]
    Today,
    /// Tomorrow.
    Tomorrow,
    /// The coming week.
    Week,
}

impl From<Option<String>> for WeatherDay {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("tomorrow") | Some("فردا") => Self::Tomorrow,
            Some("week") | Some("هفته") => Self::Week,
            _ => Self::Today,
        }
    }
}

/// Payload of a weather intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherRequest {
    /// City or place name.
    #[serde(default)]
    pub location: String,
    /// Date bucket.
    #[serde(default)]
    pub date: WeatherDay,
}

/// Calendar operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarAction {
    /// Show a date in both calendars.
    #[serde(alias = "conversion")]
    Convert,
    /// Holiday lookup.
    Holiday,
    /// Distance of a date from today.
    #[serde(alias = "difference")]
    DateInfo,
    /// Weekday of a date.
    DayOfWeek,
    /// Anything else.
    #[default]
    #[serde(other)]
    Unsupported,
}

/// Payload of a calendar intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarRequest {
    /// Operation.
    #[serde(default, alias = "query_type")]
    pub action: CalendarAction,
    /// Date the operation applies to.
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub date: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
