//! Reminder types.
//!
//! A reminder is stored under a [`DueKey`] that embeds its due epoch-seconds,
//! so the due-scan can filter records by key alone and only read the ones
//! that have come due.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Fixed tag at the start of every reminder key.
pub const DUE_TAG: &str = "DUE";

/// Storage format of [`Reminder::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format of [`Reminder::time`].
pub const TIME_FORMAT: &str = "%H:%M";

/// How a reminder repeats after it has been delivered.
///
/// Serialized as a plain string (`"none"`, `"daily"`, `"weekly"`,
/// `"monthly"`). Any other string is kept verbatim as [`Recurrence::Unrecognized`]
/// and produces no successor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Recurrence {
    /// One-shot reminder.
    #[default]
    None,
    /// Repeats every day at the same time.
    Daily,
    /// Repeats every seven days at the same time.
    Weekly,
    /// Repeats on the same day of the following month.
    Monthly,
    /// A value the bot does not know how to advance.
    Unrecognized(String),
}

impl Recurrence {
    /// Returns true if delivering this reminder should schedule another one.
    pub fn is_recurring(&self) -> bool {
        matches!(self, Self::Daily | Self::Weekly | Self::Monthly)
    }

    /// Computes the date of the next occurrence.
    ///
    /// Monthly recurrence keeps the day of month; when the following month is
    /// too short the surplus days roll forward into the month after it, so
    /// January 31st advances to March 2nd (leap year) or March 3rd.
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => add_month_overflowing(date),
            Self::None | Self::Unrecognized(_) => None,
        }
    }

    /// Returns the serialized label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Unrecognized(other) => other.as_str(),
        }
    }
}

impl From<Option<String>> for Recurrence {
    fn from(value: Option<String>) -> Self {
        let Some(value) = value else {
            return Self::None;
        };
        match value.trim().to_lowercase().as_str() {
            "" | "none" | "null" => Self::None,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<Recurrence> for Option<String> {
    fn from(value: Recurrence) -> Self {
        Some(value.as_str().to_string())
    }
}

impl From<&str> for Recurrence {
    fn from(value: &str) -> Self {
        Some(value.to_string()).into()
    }
}

fn add_month_overflowing(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// Composite storage key of a reminder: `DUE:{due_epoch_seconds}:{user_id}`.
///
/// Keys order by due time first, so sorting a set of keys sorts the
/// reminders chronologically. Two reminders for the same user due in the
/// same second share a key and the later write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueKey {
    /// Due time in epoch seconds.
    pub due: i64,
    /// Owning user.
    pub user_id: i64,
}

impl DueKey {
    /// Creates a key for a reminder due at `due` epoch seconds.
    pub fn new(due: i64, user_id: i64) -> Self {
        Self { due, user_id }
    }

    /// Returns true if the reminder is due at or before `now` epoch seconds.
    pub fn is_due(&self, now: i64) -> bool {
        self.due <= now
    }

    /// Key prefix shared by every reminder.
    pub fn prefix() -> String {
        format!("{}:", DUE_TAG)
    }
}

impl fmt::Display for DueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", DUE_TAG, self.due, self.user_id)
    }
}

/// Error returned when a string is not a well-formed [`DueKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDueKeyError(pub String);

impl fmt::Display for ParseDueKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid reminder key: {}", self.0)
    }
}

impl std::error::Error for ParseDueKeyError {}

impl FromStr for DueKey {
    type Err = ParseDueKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (Some(tag), Some(due), Some(user), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseDueKeyError(s.to_string()));
        };
        if tag != DUE_TAG {
            return Err(ParseDueKeyError(s.to_string()));
        }
        let due = due.parse().map_err(|_| ParseDueKeyError(s.to_string()))?;
        let user_id = user.parse().map_err(|_| ParseDueKeyError(s.to_string()))?;
        Ok(Self { due, user_id })
    }
}

/// A scheduled notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Owning user.
    pub user_id: i64,

    /// Chat the notification is delivered to.
    pub chat_id: i64,

    /// Local time of day, `HH:MM`.
    pub time: String,

    /// Local calendar date, `YYYY-MM-DD` (Gregorian).
    pub date: String,

    /// What to remind about.
    pub description: String,

    /// Repeat mode.
    #[serde(default)]
    pub recurrence: Recurrence,

    /// IANA timezone the date and time are expressed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// When this record was created.
    pub created: DateTime<Utc>,
}

impl Reminder {
    /// Creates a reminder for a local date and time.
    pub fn new(
        user_id: i64,
        chat_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        description: impl Into<String>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            user_id,
            chat_id,
            time: time.format(TIME_FORMAT).to_string(),
            date: date.format(DATE_FORMAT).to_string(),
            description: description.into(),
            recurrence,
            timezone: None,
            created: Utc::now(),
        }
    }

    /// Sets the timezone the reminder's date and time are read in.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = Some(tz.name().to_string());
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    /// Returns the timezone of this reminder, or `default` if none is recorded
    /// or the recorded name is unknown.
    pub fn tz(&self, default: Tz) -> Tz {
        self.timezone
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(default)
    }

    /// Parses the stored date and time.
    pub fn local_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()?;
        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT).ok()?;
        Some(date.and_time(time))
    }

    /// Resolves the due instant.
    ///
    /// Ambiguous wall times (clocks turned back) take the earlier instant. Wall
    /// times skipped by a clock change are read with the offset in force
    /// before the change, so 02:30 on a spring-forward night falls due at
    /// 03:30 of the new offset.
    pub fn due_at(&self, default_tz: Tz) -> Option<DateTime<Utc>> {
        let local = self.local_datetime()?;
        let tz = self.tz(default_tz);
        tz.from_local_datetime(&local)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Derives the storage key from the date and time fields.
    pub fn due_key(&self, default_tz: Tz) -> Option<DueKey> {
        self.due_at(default_tz)
            .map(|due| DueKey::new(due.timestamp(), self.user_id))
    }

    /// Builds the next occurrence of a recurring reminder.
    ///
    /// Returns `None` for one-shot reminders, unrecognized recurrence values
    /// and unparseable dates.
    pub fn successor(&self, created: DateTime<Utc>) -> Option<Reminder> {
        let current = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()?;
        let next = self.recurrence.advance(current)?;
        Some(Reminder {
            date: next.format(DATE_FORMAT).to_string(),
            created,
            ..self.clone()
        })
    }
}
