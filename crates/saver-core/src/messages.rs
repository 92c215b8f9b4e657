//! User-facing texts.
//!
//! Every reply the bot sends is Persian; dates and times inside them use
//! Persian digits.

use saver_models::Recurrence;

/// Reply to any failure inside message processing.
pub const APOLOGY: &str = "⚠️ متأسفانه مشکلی پیش آمده. لطفا دوباره تلاش کنید.";

/// Reply when the model could not classify the message.
pub const NOT_UNDERSTOOD: &str = "❓ متوجه نشدم. لطفا به شکل دیگری بیان کنید.";

pub const REMINDER_INVALID_DATE: &str =
    "❌ تاریخ یا ساعت یادآور نامعتبر است. لطفا دوباره با تاریخ و ساعت مشخص بگویید.";

pub const NO_REMINDERS: &str = "🔕 شما هیچ یادآور فعالی ندارید.";

pub const TODO_EMPTY: &str = "📝 لیست کارهای شما خالی است.";
pub const TODO_INVALID_INDEX: &str = "❌ شماره کار نامعتبر است.";
pub const TODO_MISSING_TEXT: &str = "❌ متن کار مشخص نیست.";
pub const TODO_INVALID_ACTION: &str = "❓ عملیات نامعتبر برای لیست کارها.";

pub const CALENDAR_INVALID_ACTION: &str = "❓ عملیات نامعتبر برای تقویم.";
pub const CALENDAR_INVALID_DATE: &str = "❌ تاریخ نامعتبر است.";

/// Reply to `/start`.
pub fn welcome(first_name: &str) -> String {
    format!(
        "سلام {} عزیز! 👋✨\n\n\
         🤖 من دستیار هوشمند شما هستم.\n\n\
         🌟 در این کارها کمکتان می‌کنم:\n\n\
         🔔 تنظیم یادآور\n\
         ❓ پاسخ به سوالات\n\
         📝 مدیریت لیست کارها\n\
         🌤️ آب و هوا\n\
         📅 تبدیل تاریخ شمسی و میلادی\n\n\
         💬 کافیست به فارسی با من صحبت کنید، مثلا:\n\
         «فردا ساعت ۹ صبح یادم بنداز برم دکتر» 🏥\n\n\
         راهنما: /help",
        first_name
    )
}

/// Reply to `/help`.
pub const HELP: &str = "راهنمای استفاده از ربات 📚\n\n\
🔔 یادآور:\n\
  «فردا ساعت ۹ صبح یادم بنداز برم دکتر»\n\
  «هر روز ساعت ۸ شب یادم بنداز قرصم رو بخورم»\n\
  /reminders برای دیدن یادآورهای فعال\n\n\
❓ سوال:\n\
  «چطور می‌تونم انگلیسی یاد بگیرم؟»\n\n\
🌤️ آب و هوا:\n\
  «آب و هوای تهران فردا چطوره؟»\n\n\
📅 تقویم:\n\
  «تاریخ امروز به شمسی چنده؟»\n\
  «۲۰۲۴-۰۳-۱۵ چه روزی از هفته است؟»\n\n\
📝 لیست کارها:\n\
  «یه کار جدید اضافه کن: خرید نان»\n\
  «لیست کارهام رو نشون بده»\n\
  «کار ۱ انجام شد»";

/// Persian label of a recurrence mode, if it repeats.
pub fn recurrence_label(recurrence: &Recurrence) -> Option<&str> {
    match recurrence {
        Recurrence::None => None,
        Recurrence::Daily => Some("هر روز"),
        Recurrence::Weekly => Some("هر هفته"),
        Recurrence::Monthly => Some("هر ماه"),
        Recurrence::Unrecognized(other) => Some(other.as_str()),
    }
}

/// Confirmation after a reminder has been stored.
pub fn reminder_set(date: &str, time: &str, description: &str, recurrence: &Recurrence) -> String {
    let mut text = format!(
        "✅ یادآور شما با موفقیت تنظیم شد! 🎉\n\n\
         📅 تاریخ: {}\n\
         ⏰ ساعت: {}\n\
         📝 موضوع: «{}»\n\n\
         🔔 در زمان مقرر به شما اطلاع خواهم داد! 👍",
        date, time, description
    );
    if let Some(label) = recurrence_label(recurrence) {
        text.push_str(&format!("\n🔄 این یادآور {} تکرار خواهد شد.", label));
    }
    text
}

/// Notification sent when a reminder comes due.
pub fn reminder_due(first_name: Option<&str>, description: &str, date: &str, time: &str) -> String {
    let greeting = first_name
        .map(|name| format!("{} عزیز، ", name))
        .unwrap_or_default();
    format!(
        "⏰ یادآوری مهم ⏰\n\n\
         {}🔔 زمان «{}» فرا رسیده!\n\n\
         ⏱️ زمان: {}\n\
         📅 تاریخ: {}\n\n\
         ✨ روز خوبی داشته باشید! ✨",
        greeting, description, time, date
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_set_mentions_recurrence_only_when_repeating() {
        let once = reminder_set("۱ فروردین ۱۴۰۳", "۰۹:۰۰", "دکتر", &Recurrence::None);
        assert!(once.contains("«دکتر»"));
        assert!(!once.contains("🔄"));

        let daily = reminder_set("۱ فروردین ۱۴۰۳", "۰۹:۰۰", "دکتر", &Recurrence::Daily);
        assert!(daily.contains("هر روز"));
    }

    #[test]
    fn test_reminder_due_greets_known_users() {
        assert!(reminder_due(Some("Sara"), "x", "d", "t").contains("Sara عزیز"));
        assert!(!reminder_due(None, "x", "d", "t").contains("عزیز"));
    }
}
