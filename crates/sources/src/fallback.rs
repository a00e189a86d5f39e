//! Seed contests shown when every upstream source fails, so the listing is
//! never empty. Start times are approximated as the next occurrence of each
//! platform's usual weekday/time slot.

use algobell_core::types::{Contest, Platform};
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};

/// Next occurrence of `weekday` at `at` UTC strictly after today.
/// A matching slot earlier today still rolls forward a full week.
pub fn next_weekday(now: DateTime<Utc>, weekday: Weekday, at: NaiveTime) -> DateTime<Utc> {
    let today = now.date_naive();
    let days_ahead = (weekday.num_days_from_monday() + 7
        - today.weekday().num_days_from_monday())
        % 7;
    let days_ahead = if days_ahead == 0 { 7 } else { days_ahead };
    let date = today + Duration::days(days_ahead as i64);
    Utc.from_utc_datetime(&date.and_time(at))
}

fn slot(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("static slot time")
}

pub fn seed_contests(now: DateTime<Utc>) -> Vec<Contest> {
    let lc_weekly = next_weekday(now, Weekday::Sun, slot(2, 30));
    let lc_biweekly = next_weekday(now, Weekday::Sat, slot(20, 0));
    let cc_starters = next_weekday(now, Weekday::Wed, slot(20, 0));
    let ac_abc = next_weekday(now, Weekday::Sat, slot(17, 30));

    vec![
        Contest::new(
            "lc-weekly",
            "Weekly Contest",
            Platform::LeetCode,
            lc_weekly,
            lc_weekly + Duration::seconds(5400),
            "https://leetcode.com/contest/",
            now,
        ),
        Contest::new(
            "lc-biweekly",
            "Biweekly Contest",
            Platform::LeetCode,
            lc_biweekly,
            lc_biweekly + Duration::seconds(5400),
            "https://leetcode.com/contest/",
            now,
        ),
        Contest::new(
            "cc-starters",
            "Starters",
            Platform::CodeChef,
            cc_starters,
            cc_starters + Duration::seconds(7200),
            "https://www.codechef.com/contests",
            now,
        ),
        Contest::new(
            "ac-abc",
            "AtCoder Beginner Contest",
            Platform::AtCoder,
            ac_abc,
            ac_abc + Duration::seconds(6000),
            "https://atcoder.jp/contests/",
            now,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_next_weekday_later_this_week() {
        // 2025-06-16 is a Monday.
        let now = t(2025, 6, 16, 12, 0);
        let next = next_weekday(now, Weekday::Wed, slot(20, 0));
        assert_eq!(next, t(2025, 6, 18, 20, 0));
    }

    #[test]
    fn test_next_weekday_same_day_rolls_a_week() {
        let now = t(2025, 6, 18, 12, 0); // Wednesday
        let next = next_weekday(now, Weekday::Wed, slot(20, 0));
        assert_eq!(next, t(2025, 6, 25, 20, 0));
    }

    #[test]
    fn test_next_weekday_wraps_around_the_week() {
        let now = t(2025, 6, 20, 12, 0); // Friday
        let next = next_weekday(now, Weekday::Wed, slot(20, 0));
        assert_eq!(next, t(2025, 6, 25, 20, 0));
    }

    #[test]
    fn test_next_weekday_accepts_any_naive_time() {
        let now = t(2025, 6, 16, 12, 0);
        let late = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let next = next_weekday(now, Weekday::Tue, late);
        assert_eq!(next.date_naive(), t(2025, 6, 17, 0, 0).date_naive());
        assert_eq!(next.time(), late);
    }

    #[test]
    fn test_seed_contests_never_empty_and_always_upcoming() {
        let now = t(2025, 6, 16, 12, 0);
        let seeds = seed_contests(now);
        assert_eq!(seeds.len(), 4);
        for contest in &seeds {
            assert!(contest.start_time > now);
            assert!(contest.is_upcoming && !contest.is_live);
        }
    }

    #[test]
    fn test_seed_contest_durations() {
        let now = t(2025, 6, 16, 12, 0);
        let seeds = seed_contests(now);
        let starters = seeds.iter().find(|c| c.id == "cc-starters").unwrap();
        assert_eq!(starters.duration_seconds, 7200);
        assert_eq!(starters.platform, Platform::CodeChef);
    }
}
