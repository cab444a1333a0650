//! Daily challenge post: message layout and scheduling arithmetic.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use digest_core::{render_for_display, truncate_chars, ProblemRecord};

pub const SIGN_OFF: &str = "**GOOD LUCK CODING! 🚀**";

/// Card wrapped in the daily header and sign-off, bounded by `message_limit`.
pub fn format_daily_post(
    record: &ProblemRecord,
    date: NaiveDate,
    card_limit: usize,
    message_limit: usize,
) -> String {
    let post = format!(
        "*📌 # LeetCode Daily Challenge ({})*\n\n{}\n\n{SIGN_OFF}\n",
        date.format("%d/%m/%Y"),
        render_for_display(record, card_limit),
    );
    truncate_chars(&post, message_limit)
}

pub fn thread_title(record: &ProblemRecord, date: NaiveDate) -> String {
    format!(
        "🧪 **LeetCode - {} - {} - {}**",
        date.format("%d/%m"),
        record.title,
        record.difficulty
    )
}

/// Next occurrence of `at`: today if still ahead of `now`, otherwise tomorrow.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        return today;
    }
    today
        .checked_add_days(Days::new(1))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::Difficulty;
    use pretty_assertions::assert_eq;

    fn record() -> ProblemRecord {
        ProblemRecord {
            id: 20,
            slug: "valid-parentheses".into(),
            title: "Valid Parentheses".into(),
            difficulty: Difficulty::Easy,
            description: "Check the brackets.".into(),
            examples: Vec::new(),
            constraints: Vec::new(),
            follow_up: None,
            topics: vec!["String".into(), "Stack".into()],
            hints: Vec::new(),
            url: "https://leetcode.com/problems/valid-parentheses/".into(),
            markdown: String::new(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn post_wraps_card_with_header_and_sign_off() {
        let post = format_daily_post(&record(), date(), 1950, 2000);
        assert!(post.starts_with("*📌 # LeetCode Daily Challenge (05/03/2024)*\n\n## 🟢 Valid Parentheses\n"));
        assert!(post.ends_with("\n\n**GOOD LUCK CODING! 🚀**\n"));
    }

    #[test]
    fn post_respects_message_limit() {
        let mut long = record();
        long.description = "x".repeat(5000);
        let post = format_daily_post(&long, date(), 1950, 2000);
        assert!(post.chars().count() <= 2000);
        let tight = format_daily_post(&long, date(), 1950, 300);
        assert!(tight.chars().count() <= 300);
    }

    #[test]
    fn thread_title_uses_day_and_month() {
        assert_eq!(
            thread_title(&record(), date()),
            "🧪 **LeetCode - 05/03 - Valid Parentheses - Easy**"
        );
    }

    #[test]
    fn next_run_is_today_when_time_is_ahead() {
        let now = date().and_hms_opt(6, 59, 0).unwrap();
        let at = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        assert_eq!(next_run_after(now, at), date().and_time(at));
    }

    #[test]
    fn next_run_rolls_to_tomorrow_once_passed() {
        let at = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_time(at);
        assert_eq!(next_run_after(date().and_time(at), at), tomorrow);
        assert_eq!(next_run_after(date().and_hms_opt(23, 0, 0).unwrap(), at), tomorrow);
    }
}
