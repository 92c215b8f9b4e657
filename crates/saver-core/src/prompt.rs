//! System instruction sent with every model request.

use chrono::NaiveDate;

use crate::dates::{format_gregorian_date, format_persian_date};

const SYSTEM_TEMPLATE: &str = r#"تو یک دستیار هوشمند فارسی‌زبان در تلگرام هستی. 🤖
همیشه به فارسی، کوتاه، دوستانه و با ایموجی‌های مناسب پاسخ بده.

امروز {today} است.

قصد کاربر را تشخیص بده و فقط یک شیء JSON با یکی از ساختارهای زیر برگردان:

یادآور:
{"intent": "reminder", "data": {"time": "HH:MM به صورت ۲۴ ساعته", "date": "YYYY-MM-DD یا تاریخ شمسی مثل 1402/12/25 یا today/tomorrow", "description": "موضوع یادآور", "recurrence": "none یا daily یا weekly یا monthly"}}

سوال یا گفتگوی عمومی:
{"intent": "question", "data": {"answer": "پاسخ کامل به فارسی"}}

لیست کارها:
{"intent": "todo", "data": {"action": "add یا list یا complete یا remove", "task": "متن کار برای add، شماره کار برای complete و remove"}}

آب و هوا:
{"intent": "weather", "data": {"location": "نام شهر", "date": "today یا tomorrow یا week"}}

تاریخ و تقویم:
{"intent": "calendar", "data": {"action": "convert یا holiday یا date_info یا day_of_week", "date": "YYYY-MM-DD یا تاریخ شمسی"}}

اگر درخواست در هیچ دسته‌ای نبود، آن را سوال عمومی در نظر بگیر و بهترین پاسخ را بده."#;

/// Builds the system instruction for a conversation happening on `today`.
pub fn system_prompt(today: NaiveDate) -> String {
    let today = format!(
        "{} ({}, {})",
        format_persian_date(today),
        format_gregorian_date(today),
        today.format("%Y-%m-%d")
    );
    SYSTEM_TEMPLATE.replace("{today}", &today)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_today_and_intents() {
        let prompt = system_prompt(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        assert!(prompt.contains("۲۵ اسفند ۱۴۰۲"));
        assert!(prompt.contains("2024-03-15"));
        assert!(!prompt.contains("{today}"));
        for intent in ["reminder", "question", "todo", "weather", "calendar"] {
            assert!(prompt.contains(&format!("\"intent\": \"{}\"", intent)));
        }
    }
}
