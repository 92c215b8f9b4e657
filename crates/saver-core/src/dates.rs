//! Date and time formatting and parsing.
//!
//! Dates are displayed in the Solar Hijri (Persian) calendar with Persian
//! month names and digits, and in English long-form Gregorian. Input dates
//! may be Gregorian (`2024-03-15`, `2024/03/15`), Persian (`1402/12/25`) or a
//! relative word; years below [`PERSIAN_YEAR_CUTOFF`] are read as Persian.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};

/// Years below this are interpreted as Solar Hijri.
pub const PERSIAN_YEAR_CUTOFF: i32 = 1700;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

const PERSIAN_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// A date in the Solar Hijri calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Converts a Gregorian date.
    pub fn from_gregorian(date: NaiveDate) -> Self {
        const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let gy = i64::from(date.year());
        let gm = date.month() as usize;
        let gd = i64::from(date.day());

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd
            + DAYS_BEFORE_MONTH[gm - 1];

        let mut jy = -1595 + 33 * (days / 12053);
        days %= 12053;
        jy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            jy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (jm, jd) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: jy as i32,
            month: jm as u32,
            day: jd as u32,
        }
    }

    /// Converts to the Gregorian calendar. Returns `None` for dates that do
    /// not exist, such as 30 Esfand of a common year.
    pub fn to_gregorian(self) -> Option<NaiveDate> {
        if !(1..=12).contains(&self.month) || self.day == 0 || self.day > 31 || self.year < 1 {
            return None;
        }

        let jy = i64::from(self.year) + 1595;
        let jm = i64::from(self.month);
        let jd = i64::from(self.day);

        let mut days = -355668 + 365 * jy + (jy / 33) * 8 + ((jy % 33) + 3) / 4 + jd
            + if jm < 7 { (jm - 1) * 31 } else { (jm - 7) * 30 + 186 };

        let mut gy = 400 * (days / 146097);
        days %= 146097;
        if days > 36524 {
            days -= 1;
            gy += 100 * (days / 36524);
            days %= 36524;
            if days >= 365 {
                days += 1;
            }
        }
        gy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            gy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let date = NaiveDate::from_yo_opt(gy as i32, (days + 1) as u32)?;
        // Out-of-range days wrap into the next month; reject them.
        (Self::from_gregorian(date) == self).then_some(date)
    }

    /// Persian month name.
    pub fn month_name(&self) -> &'static str {
        PERSIAN_MONTHS[(self.month as usize).saturating_sub(1).min(11)]
    }
}

/// Replaces ASCII digits with Persian digits.
pub fn to_persian_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) if c.is_ascii_digit() => PERSIAN_DIGITS[d as usize],
            _ => c,
        })
        .collect()
}

/// Replaces Persian and Arabic-Indic digits with ASCII digits.
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '۰'..='۹' => char::from(b'0' + (c as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (c as u32 - '٠' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Formats a date in the Persian calendar, e.g. `۲۵ اسفند ۱۴۰۲`.
pub fn format_persian_date(date: NaiveDate) -> String {
    let j = JalaliDate::from_gregorian(date);
    format!(
        "{} {} {}",
        to_persian_digits(&j.day.to_string()),
        j.month_name(),
        to_persian_digits(&j.year.to_string())
    )
}

/// Formats a date in English long form, e.g. `March 15, 2024`.
pub fn format_gregorian_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Formats a time of day with Persian digits, e.g. `۰۹:۳۰`.
pub fn format_persian_time(time: NaiveTime) -> String {
    to_persian_digits(&time.format("%H:%M").to_string())
}

/// Weekday name in Persian.
pub fn weekday_fa(day: Weekday) -> &'static str {
    match day {
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنجشنبه",
        Weekday::Fri => "جمعه",
    }
}

/// Weekday name in English.
pub fn weekday_en(day: Weekday) -> &'static str {
    match day {
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
    }
}

fn relative_offset(word: &str) -> Option<u64> {
    let compact: String = word
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{200c}')
        .collect();
    match compact.as_str() {
        "today" | "امروز" => Some(0),
        "tomorrow" | "فردا" => Some(1),
        "dayaftertomorrow" | "پسفردا" => Some(2),
        _ => None,
    }
}

fn weekday_from_name(word: &str) -> Option<Weekday> {
    let compact: String = word
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{200c}')
        .collect();
    let day = match compact.as_str() {
        "شنبه" | "saturday" => Weekday::Sat,
        "یکشنبه" | "sunday" => Weekday::Sun,
        "دوشنبه" | "monday" => Weekday::Mon,
        "سهشنبه" | "tuesday" => Weekday::Tue,
        "چهارشنبه" | "wednesday" => Weekday::Wed,
        "پنجشنبه" | "thursday" => Weekday::Thu,
        "جمعه" | "friday" => Weekday::Fri,
        _ => return None,
    };
    Some(day)
}

/// Parses a date as returned by the model, relative to `today`.
///
/// Accepts `YYYY-MM-DD` and `YYYY/MM/DD` in either calendar, an ISO
/// date-time (the time part is ignored), `today`/`tomorrow` and their Persian
/// forms, and weekday names, which resolve to the next such day counting
/// today.
pub fn parse_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let normalized = normalize_digits(input.trim()).to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some(offset) = relative_offset(&normalized) {
        return today.checked_add_days(Days::new(offset));
    }

    if let Some(weekday) = weekday_from_name(&normalized) {
        let ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
        return today.checked_add_days(Days::new(u64::from(ahead)));
    }

    let date_part = normalized.split(['t', ' ']).next().unwrap_or_default();
    let parts: Vec<&str> = date_part.split(['-', '/']).collect();
    let [y, m, d] = parts.as_slice() else {
        return None;
    };
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;

    if year < PERSIAN_YEAR_CUTOFF {
        JalaliDate { year, month, day }.to_gregorian()
    } else {
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Parses a 24-hour time of day: `9`, `9:30`, `09:30` or `09:30:00`.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let normalized = normalize_digits(input.trim());
    let mut parts = normalized.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    let second: u32 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jalali(year: i32, month: u32, day: u32) -> JalaliDate {
        JalaliDate { year, month, day }
    }

    #[test]
    fn test_gregorian_to_jalali() {
        assert_eq!(JalaliDate::from_gregorian(date(2024, 3, 20)), jalali(1403, 1, 1));
        assert_eq!(JalaliDate::from_gregorian(date(2024, 3, 19)), jalali(1402, 12, 29));
        assert_eq!(JalaliDate::from_gregorian(date(2025, 1, 1)), jalali(1403, 10, 12));
        assert_eq!(JalaliDate::from_gregorian(date(2024, 1, 31)), jalali(1402, 11, 11));
    }

    #[test]
    fn test_jalali_to_gregorian() {
        assert_eq!(jalali(1402, 12, 25).to_gregorian(), Some(date(2024, 3, 15)));
        assert_eq!(jalali(1403, 1, 1).to_gregorian(), Some(date(2024, 3, 20)));
    }

    #[test]
    fn test_jalali_rejects_missing_days() {
        assert_eq!(jalali(1402, 7, 31).to_gregorian(), None);
        assert_eq!(jalali(1402, 13, 1).to_gregorian(), None);
        assert_eq!(jalali(1402, 0, 1).to_gregorian(), None);
    }

    #[test]
    fn test_conversion_roundtrip_over_years() {
        let mut d = date(2015, 1, 1);
        while d < date(2030, 1, 1) {
            assert_eq!(JalaliDate::from_gregorian(d).to_gregorian(), Some(d), "{}", d);
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_digits() {
        assert_eq!(to_persian_digits("09:30"), "۰۹:۳۰");
        assert_eq!(normalize_digits("۱۴۰۲/۱۲/۲۵"), "1402/12/25");
        assert_eq!(normalize_digits("٣:٤٥"), "3:45");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_persian_date(date(2024, 3, 15)), "۲۵ اسفند ۱۴۰۲");
        assert_eq!(format_gregorian_date(date(2024, 3, 5)), "March 5, 2024");
        assert_eq!(
            format_persian_time(NaiveTime::from_hms_opt(9, 5, 0).unwrap()),
            "۰۹:۰۵"
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let today = date(2024, 1, 1);
        assert_eq!(parse_date("2024-03-15", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024/03/15", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024-03-15T09:00:00", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("1402/12/25", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("۱۴۰۲/۱۲/۲۵", today), Some(date(2024, 3, 15)));
        assert_eq!(parse_date("2024-02-30", today), None);
        assert_eq!(parse_date("someday", today), None);
        assert_eq!(parse_date("", today), None);
    }

    #[test]
    fn test_parse_relative_dates() {
        let today = date(2024, 1, 1);
        assert_eq!(parse_date("today", today), Some(today));
        assert_eq!(parse_date("Tomorrow", today), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("فردا", today), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("پس‌فردا", today), Some(date(2024, 1, 3)));
        assert_eq!(parse_date("پس فردا", today), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_parse_weekday_names() {
        // 2024-01-01 is a Monday.
        let today = date(2024, 1, 1);
        assert_eq!(parse_date("دوشنبه", today), Some(today));
        assert_eq!(parse_date("شنبه", today), Some(date(2024, 1, 6)));
        assert_eq!(parse_date("یکشنبه", today), Some(date(2024, 1, 7)));
        assert_eq!(parse_date("سه‌شنبه", today), Some(date(2024, 1, 2)));
        assert_eq!(parse_date("friday", today), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("9"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("۱۴:۳۰"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time("14:30:15"), NaiveTime::from_hms_opt(14, 30, 15));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("noon"), None);
        assert_eq!(parse_time("1:2:3:4"), None);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_fa(date(2024, 3, 15).weekday()), "جمعه");
        assert_eq!(weekday_en(date(2024, 3, 15).weekday()), "Friday");
    }
}
