//! Calendar queries.

use chrono::{Datelike, NaiveDate};
use saver_models::{CalendarAction, CalendarRequest};

use crate::dates::{
    format_gregorian_date, format_persian_date, parse_date, to_persian_digits, weekday_en, weekday_fa,
};
use crate::messages;

/// Answers a calendar query. A request without a date refers to `today`.
pub fn handle_calendar(request: &CalendarRequest, today: NaiveDate) -> String {
    let date = match request.date.as_deref().map(str::trim) {
        None | Some("") => today,
        Some(raw) => match parse_date(raw, today) {
            Some(date) => date,
            None => return messages::CALENDAR_INVALID_DATE.to_string(),
        },
    };
    let persian = format_persian_date(date);

    match request.action {
        CalendarAction::Convert => format!(
            "📅 تاریخ {} برابر است با {} در تقویم شمسی.",
            format_gregorian_date(date),
            persian
        ),
        CalendarAction::Holiday => {
            format!("🗓️ اطلاعات تعطیلات برای تاریخ {} در دسترس نیست.", persian)
        }
        CalendarAction::DateInfo => {
            let days = (date - today).num_days();
            let count = to_persian_digits(&days.abs().to_string());
            match days {
                0 => format!("📆 تاریخ {} امروز است.", persian),
                d if d > 0 => format!("📆 تاریخ {} {} روز دیگر است.", persian, count),
                _ => format!("📆 تاریخ {} {} روز پیش بوده است.", persian, count),
            }
        }
        CalendarAction::DayOfWeek => format!(
            "📅 {} ({}) روز {} ({}) است.",
            persian,
            format_gregorian_date(date),
            weekday_fa(date.weekday()),
            weekday_en(date.weekday())
        ),
        CalendarAction::Unsupported => messages::CALENDAR_INVALID_ACTION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    fn ask(action: CalendarAction, date: Option<&str>) -> String {
        let request = CalendarRequest {
            action,
            date: date.map(str::to_string),
        };
        handle_calendar(&request, today())
    }

    #[test]
    fn test_convert() {
        assert_eq!(
            ask(CalendarAction::Convert, Some("2024-03-15")),
            "📅 تاریخ March 15, 2024 برابر است با ۲۵ اسفند ۱۴۰۲ در تقویم شمسی."
        );
        // Persian input converts the other way.
        assert!(ask(CalendarAction::Convert, Some("1403/01/01")).contains("March 20, 2024"));
    }

    #[test]
    fn test_date_info() {
        assert!(ask(CalendarAction::DateInfo, Some("2024-03-15")).contains("۵ روز دیگر"));
        assert!(ask(CalendarAction::DateInfo, Some("2024-03-01")).contains("۹ روز پیش"));
        assert!(ask(CalendarAction::DateInfo, Some("today")).contains("امروز است"));
        assert!(ask(CalendarAction::DateInfo, None).contains("امروز است"));
    }

    #[test]
    fn test_day_of_week() {
        let reply = ask(CalendarAction::DayOfWeek, Some("2024-03-15"));
        assert!(reply.contains("جمعه"));
        assert!(reply.contains("Friday"));
    }

    #[test]
    fn test_holiday_and_invalid() {
        assert!(ask(CalendarAction::Holiday, Some("2024-03-20")).contains("در دسترس نیست"));
        assert_eq!(ask(CalendarAction::Unsupported, Some("2024-03-20")), messages::CALENDAR_INVALID_ACTION);
        assert_eq!(ask(CalendarAction::Convert, Some("not a date")), messages::CALENDAR_INVALID_DATE);
    }
}
